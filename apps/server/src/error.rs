use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profilesync_shared::error::{AuthError, ProfileSyncError, StorageError};

/// Newtype wrapper for `ProfileSyncError` that implements `IntoResponse`.
///
/// Orphan rule: neither the trait (`IntoResponse`)
/// nor the type (`ProfileSyncError`) is defined in this crate.
#[derive(Debug)]
pub struct ServerError(pub ProfileSyncError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ProfileSyncError::NotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            ProfileSyncError::Unauthorized | ProfileSyncError::NoActiveSession => {
                (StatusCode::UNAUTHORIZED, self.0.to_string())
            }
            ProfileSyncError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ProfileSyncError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ProfileSyncError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ProfileSyncError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ProfileSyncError> for ServerError {
    fn from(e: ProfileSyncError) -> Self {
        ServerError(e)
    }
}

impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        ServerError(e.into())
    }
}

impl From<StorageError> for ServerError {
    fn from(e: StorageError) -> Self {
        ServerError(e.into())
    }
}
