use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use profilesync_shared::api::auth::{CredentialsRequest, SessionResponse};

use crate::error::ServerError;
use crate::session::IdentitySession;
use crate::state::AppState;

/// POST /api/auth/sign-up: create an account and return an access token.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ServerError> {
    let session = IdentitySession::new(state.identity.clone());
    let user = session.sign_up(&req.email, &req.password).await?;
    let token = state.jwt.issue_access_token(&user.id)?;
    Ok((StatusCode::CREATED, Json(SessionResponse { token, user })))
}

/// POST /api/auth/sign-in: exchange email/password for an access token.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ServerError> {
    let session = IdentitySession::new(state.identity.clone());
    let user = session.sign_in(&req.email, &req.password).await.map_err(|e| {
        tracing::debug!(cause = %e, "sign-in rejected");
        e
    })?;
    let token = state.jwt.issue_access_token(&user.id)?;
    Ok(Json(SessionResponse { token, user }))
}
