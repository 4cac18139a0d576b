//! Value types for one profile-edit round trip: the request the caller builds,
//! the per-stage outcomes, and their aggregate.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, StorageError, ValidationError};

/// New avatar image bytes as picked by the user. `content_type` is stored
/// with the object when the store supports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl AvatarPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Edits collected from the profile form. Empty strings mean "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEditRequest {
    pub display_name: String,
    pub new_password: String,
    pub confirm_password: String,
    pub avatar: Option<AvatarPayload>,
}

impl ProfileEditRequest {
    /// True when no stage would touch the backend.
    pub fn is_empty(&self) -> bool {
        self.avatar.is_none()
            && self.display_name.is_empty()
            && self.new_password.is_empty()
    }
}

/// The three independent update operations, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Avatar,
    DisplayName,
    Password,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [Stage::Avatar, Stage::DisplayName, Stage::Password];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Avatar => "avatar",
            Stage::DisplayName => "display_name",
            Stage::Password => "password",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which layer a stage failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Auth,
    Storage,
    Validation,
}

/// Why a stage failed. `cause` is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{cause}")]
pub struct StageFailure {
    pub kind: FailureKind,
    pub cause: String,
}

impl From<AuthError> for StageFailure {
    fn from(e: AuthError) -> Self {
        Self {
            kind: FailureKind::Auth,
            cause: e.cause,
        }
    }
}

impl From<StorageError> for StageFailure {
    fn from(e: StorageError) -> Self {
        Self {
            kind: FailureKind::Storage,
            cause: e.cause,
        }
    }
}

impl From<ValidationError> for StageFailure {
    fn from(e: ValidationError) -> Self {
        Self {
            kind: FailureKind::Validation,
            cause: e.to_string(),
        }
    }
}

/// Result of a single stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Nothing was requested for this field.
    Skipped,
    Applied,
    Failed(StageFailure),
}

impl UpdateOutcome {
    pub fn failed(failure: impl Into<StageFailure>) -> Self {
        UpdateOutcome::Failed(failure.into())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UpdateOutcome::Failed(_))
    }

    pub fn failure_cause(&self) -> Option<&str> {
        match self {
            UpdateOutcome::Failed(failure) => Some(failure.cause.as_str()),
            _ => None,
        }
    }
}

/// Outcomes of every stage of one `apply` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdateResult {
    pub avatar: UpdateOutcome,
    pub display_name: UpdateOutcome,
    pub password: UpdateOutcome,
}

impl Default for ProfileUpdateResult {
    fn default() -> Self {
        Self::skipped()
    }
}

impl ProfileUpdateResult {
    pub fn skipped() -> Self {
        Self {
            avatar: UpdateOutcome::Skipped,
            display_name: UpdateOutcome::Skipped,
            password: UpdateOutcome::Skipped,
        }
    }

    pub fn outcome(&self, stage: Stage) -> &UpdateOutcome {
        match stage {
            Stage::Avatar => &self.avatar,
            Stage::DisplayName => &self.display_name,
            Stage::Password => &self.password,
        }
    }

    /// Derived: true iff no stage failed.
    pub fn overall_success(&self) -> bool {
        Stage::ORDER
            .iter()
            .all(|stage| !self.outcome(*stage).is_failed())
    }

    /// User-facing messages, one per attempted stage in stage order, then a
    /// closing confirmation only when everything succeeded.
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = Stage::ORDER
            .iter()
            .filter_map(|stage| stage_message(*stage, self.outcome(*stage)))
            .collect();
        if self.overall_success() {
            messages.push("Profile updated".to_string());
        }
        messages
    }
}

fn stage_message(stage: Stage, outcome: &UpdateOutcome) -> Option<String> {
    let message = match (stage, outcome) {
        (_, UpdateOutcome::Skipped) => return None,
        (Stage::Avatar, UpdateOutcome::Applied) => "Profile photo updated".to_string(),
        (Stage::Avatar, UpdateOutcome::Failed(f)) => {
            format!("Failed to update profile photo: {f}")
        }
        (Stage::DisplayName, UpdateOutcome::Applied) => "Username updated".to_string(),
        (Stage::DisplayName, UpdateOutcome::Failed(f)) => {
            format!("Failed to update username: {f}")
        }
        (Stage::Password, UpdateOutcome::Applied) => "Password updated".to_string(),
        (Stage::Password, UpdateOutcome::Failed(f))
            if f.kind == FailureKind::Validation
                && f.cause == ValidationError::PasswordMismatch.to_string() =>
        {
            "Passwords do not match".to_string()
        }
        (Stage::Password, UpdateOutcome::Failed(f)) => {
            format!("Failed to update password: {f}")
        }
    };
    Some(message)
}
