use crate::identity::UserIdentity;
use serde::{Deserialize, Serialize};

/// Email/password credentials for sign-in and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Session response with an access token and the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserIdentity,
}
