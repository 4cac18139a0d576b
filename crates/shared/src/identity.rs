use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Live handle on an authenticated principal.
///
/// The identity backend owns this record. Callers never keep their own copy
/// around; they re-read it from the backend or are handed the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields of a profile-update call. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileChanges {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            avatar_url: None,
        }
    }

    pub fn avatar_url(url: impl Into<String>) -> Self {
        Self {
            display_name: None,
            avatar_url: Some(url.into()),
        }
    }
}
