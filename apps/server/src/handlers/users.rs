use axum::extract::State;
use axum::Json;
use axum_extra::extract::Multipart;
use profilesync_shared::api::user::ProfileUpdateResponse;
use profilesync_shared::error::ProfileSyncError;
use profilesync_shared::identity::UserIdentity;
use profilesync_shared::profile::{AvatarPayload, ProfileEditRequest};

use crate::error::ServerError;
use crate::extractors::auth::AuthUser;
use crate::session::IdentitySession;
use crate::state::AppState;

/// GET /api/users/me: live profile of the authenticated user.
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserIdentity>, ServerError> {
    let session = IdentitySession::restore(state.identity.clone(), auth_user.user_id).await?;
    let user = session
        .current_user()
        .ok_or(ServerError(ProfileSyncError::NoActiveSession))?;
    Ok(Json(user))
}

/// PATCH /api/users/me: multipart profile edit.
///
/// Fields: `display_name`, `new_password`, `confirm_password` (text) and
/// `avatar` (file). Omitted fields mean "no change". Always answers 200 with
/// the per-stage outcomes once the session is established.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ProfileUpdateResponse>, ServerError> {
    let request = parse_edit_multipart(&mut multipart).await?;
    let session = IdentitySession::restore(state.identity.clone(), auth_user.user_id).await?;

    let result = state.profiles.apply_for_session(&session, request).await?;
    let user = session
        .current_user()
        .ok_or(ServerError(ProfileSyncError::NoActiveSession))?;

    tracing::info!(
        user_id = %user.id,
        overall_success = result.overall_success(),
        "profile edit processed"
    );
    Ok(Json(ProfileUpdateResponse::new(result, user)))
}

/// Collect the edit form. An empty `avatar` part counts as "no new photo".
async fn parse_edit_multipart(multipart: &mut Multipart) -> Result<ProfileEditRequest, ServerError> {
    let mut request = ProfileEditRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "malformed multipart body");
        ServerError(ProfileSyncError::Validation("malformed multipart body".into()))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "display_name" | "new_password" | "confirm_password" => {
                let value = field.text().await.map_err(|_| {
                    ServerError(ProfileSyncError::Validation(format!("failed to read {name}")))
                })?;
                match name.as_str() {
                    "display_name" => request.display_name = value,
                    "new_password" => request.new_password = value,
                    _ => request.confirm_password = value,
                }
            }
            "avatar" => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|_| {
                    ServerError(ProfileSyncError::Validation("failed to read avatar".into()))
                })?;
                if !data.is_empty() {
                    request.avatar = Some(AvatarPayload {
                        bytes: data.to_vec(),
                        content_type,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(request)
}
