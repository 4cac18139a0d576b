use crate::identity::UserIdentity;
use crate::profile::{ProfileUpdateResult, UpdateOutcome};
use serde::{Deserialize, Serialize};

/// Response to a profile edit: per-stage outcomes plus the messages a client
/// shows, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub avatar: UpdateOutcome,
    pub display_name: UpdateOutcome,
    pub password: UpdateOutcome,
    pub overall_success: bool,
    pub messages: Vec<String>,
    pub user: UserIdentity,
}

impl ProfileUpdateResponse {
    pub fn new(result: ProfileUpdateResult, user: UserIdentity) -> Self {
        let overall_success = result.overall_success();
        let messages = result.messages();
        Self {
            avatar: result.avatar,
            display_name: result.display_name,
            password: result.password,
            overall_success,
            messages,
            user,
        }
    }
}
