/// Failure reported by the identity backend.
///
/// `cause` is the backend's own classification (`weak-password`,
/// `invalid-credential`, ...) and is passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{cause}")]
pub struct AuthError {
    pub cause: String,
}

impl AuthError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// True for causes that mean "these credentials do not identify anyone".
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self.cause.as_str(),
            "invalid-credential" | "user-not-found" | "user-disabled"
        )
    }
}

/// Failure reported by the object store while uploading or resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{cause}")]
pub struct StorageError {
    pub cause: String,
}

impl StorageError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Checks performed locally, before any backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("password mismatch")]
    PasswordMismatch,

    #[error("avatar image must be {max} bytes or fewer")]
    AvatarTooLarge { max: usize },
}

/// Service-level error used by the server and the orchestration entry points.
#[derive(Debug, thiserror::Error)]
pub enum ProfileSyncError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("no active session")]
    NoActiveSession,
}

impl From<AuthError> for ProfileSyncError {
    fn from(e: AuthError) -> Self {
        if e.is_credential_failure() {
            return ProfileSyncError::Unauthorized;
        }
        match e.cause.as_str() {
            "email-already-in-use" => ProfileSyncError::Conflict(e.cause),
            "invalid-email"
            | "weak-password"
            | "invalid-display-name"
            | "missing-email"
            | "missing-password" => {
                ProfileSyncError::Validation(e.cause)
            }
            _ => ProfileSyncError::Internal(e.cause),
        }
    }
}

impl From<StorageError> for ProfileSyncError {
    fn from(e: StorageError) -> Self {
        ProfileSyncError::ServiceUnavailable(e.cause)
    }
}
