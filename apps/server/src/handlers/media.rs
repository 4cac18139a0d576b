use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use object_store::path::Path as StorePath;
use object_store::Attribute;
use profilesync_shared::constants::AVATAR_PREFIX;
use profilesync_shared::error::ProfileSyncError;

use crate::error::ServerError;
use crate::state::AppState;

/// GET /media/{*key}: serve a stored avatar. Only keys under the avatar
/// prefix are reachable. The content type recorded at upload wins over the
/// key's extension.
pub async fn get_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ServerError> {
    let store_path =
        StorePath::parse(&key).map_err(|_| ServerError(ProfileSyncError::NotFound))?;
    if !store_path.as_ref().starts_with(&format!("{AVATAR_PREFIX}/")) {
        return Err(ServerError(ProfileSyncError::NotFound));
    }

    let result = state
        .object_store
        .get(&store_path)
        .await
        .map_err(|e| match e {
            object_store::Error::NotFound { .. } => ServerError(ProfileSyncError::NotFound),
            other => {
                tracing::error!(error = %other, "object store get failed");
                ServerError(ProfileSyncError::Internal("file storage error".into()))
            }
        })?;

    let content_type = result
        .attributes
        .get(&Attribute::ContentType)
        .map(|value| value.as_ref().to_string())
        .unwrap_or_else(|| content_type_for(&key).to_string());

    let bytes = result.bytes().await.map_err(|e| {
        tracing::error!(error = %e, "object store read failed");
        ServerError(ProfileSyncError::Internal("file storage error".into()))
    })?;

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(bytes))
        .map_err(|_| ServerError(ProfileSyncError::Internal("response build error".into())))
}

fn content_type_for(key: &str) -> &'static str {
    let lower = key.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_objects_are_served_as_jpeg() {
        assert_eq!(content_type_for("profile_photos/u/profile.jpg"), "image/jpeg");
        assert_eq!(content_type_for("profile_photos/u/PROFILE.PNG"), "image/png");
        assert_eq!(content_type_for("profile_photos/u/blob"), "application/octet-stream");
    }
}
