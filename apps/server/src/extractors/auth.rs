use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profilesync_shared::ids::UserId;

use crate::state::AppState;

/// Authenticated user information extracted from a valid access JWT.
///
/// Use this as a handler parameter to require authentication:
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "unauthorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!("auth: missing or non-ASCII Authorization header");
                AuthRejection
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::debug!("auth: Authorization header missing Bearer prefix");
            AuthRejection
        })?;

        let claims = state.jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "auth: token validation failed");
            AuthRejection
        })?;

        let user_id: UserId = claims.sub.parse().map_err(|_| AuthRejection)?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::ServerConfig;
    use crate::identity::LocalIdentityBackend;
    use crate::jwt::tests::test_jwt_config;

    fn test_app_state() -> AppState {
        let config = ServerConfig {
            jwt: test_jwt_config(),
            ..ServerConfig::default()
        };
        AppState::new(
            config,
            Arc::new(LocalIdentityBackend::new()),
            Arc::new(object_store::memory::InMemory::new()),
        )
        .unwrap()
    }

    async fn extract(state: &AppState, authorization: Option<&str>) -> Result<AuthUser, AuthRejection> {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn auth_user_extractor_returns_user_id_from_valid_token() {
        let state = test_app_state();
        let uid = UserId::new();
        let token = state.jwt.issue_access_token(&uid).unwrap();

        let auth = extract(&state, Some(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(auth.user_id, uid);
    }

    #[tokio::test]
    async fn auth_user_extractor_returns_401_when_header_missing() {
        let state = test_app_state();
        let response = extract(&state, None).await.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn auth_user_extractor_returns_401_without_bearer_prefix() {
        let state = test_app_state();
        let token = state.jwt.issue_access_token(&UserId::new()).unwrap();
        let result = extract(&state, Some(&token)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn auth_user_extractor_returns_401_when_token_is_malformed() {
        let state = test_app_state();
        let response = extract(&state, Some("Bearer not-a-jwt"))
            .await
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
