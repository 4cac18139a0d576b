use std::sync::{Arc, RwLock};

use profilesync_shared::error::AuthError;
use profilesync_shared::identity::UserIdentity;
use profilesync_shared::ids::UserId;

use crate::identity::IdentityBackend;

/// The currently authenticated principal plus a handle to the identity backend.
///
/// Pass-through only: no retries and no caching beyond the current handle.
pub struct IdentitySession {
    backend: Arc<dyn IdentityBackend>,
    current: RwLock<Option<UserIdentity>>,
}

impl IdentitySession {
    /// A session with nobody signed in.
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self {
            backend,
            current: RwLock::new(None),
        }
    }

    /// Resume a session for a principal authenticated elsewhere (e.g. by an
    /// access token), re-reading its live record.
    pub async fn restore(
        backend: Arc<dyn IdentityBackend>,
        user_id: UserId,
    ) -> Result<Self, AuthError> {
        let user = backend.get_user(user_id).await?;
        let session = Self::new(backend);
        session.set_current(Some(user));
        Ok(session)
    }

    pub fn backend(&self) -> &Arc<dyn IdentityBackend> {
        &self.backend
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        require_credentials(email, password)?;
        let user = self.backend.sign_in(email, password).await?;
        tracing::info!(user_id = %user.id, "session: signed in");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        require_credentials(email, password)?;
        let user = self.backend.sign_up(email, password).await?;
        tracing::info!(user_id = %user.id, "session: signed up");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    /// Synchronous, never fails. `None` means no active session.
    pub fn current_user(&self) -> Option<UserIdentity> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Re-read the current user from the backend.
    pub async fn reload(&self) -> Result<Option<UserIdentity>, AuthError> {
        let Some(user) = self.current_user() else {
            return Ok(None);
        };
        let fresh = self.backend.get_user(user.id).await?;
        self.set_current(Some(fresh.clone()));
        Ok(Some(fresh))
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current_user() {
            tracing::info!(user_id = %user.id, "session: signed out");
        }
        self.set_current(None);
    }

    pub(crate) fn set_current(&self, user: Option<UserIdentity>) {
        match self.current.write() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }
}

fn require_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::new("missing-email"));
    }
    if password.is_empty() {
        return Err(AuthError::new("missing-password"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityBackend;
    use profilesync_shared::identity::ProfileChanges;

    fn backend() -> Arc<dyn IdentityBackend> {
        Arc::new(
            LocalIdentityBackend::new()
                .with_hash_params(argon2::Params::new(1024, 1, 1, None).unwrap()),
        )
    }

    #[test]
    fn new_session_has_no_current_user() {
        let session = IdentitySession::new(backend());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn sign_up_sets_current_user() {
        let session = IdentitySession::new(backend());
        let user = session.sign_up("a@b.com", "secret123").await.unwrap();
        assert_eq!(session.current_user(), Some(user));
    }

    #[tokio::test]
    async fn sign_in_sets_current_user() {
        let backend = backend();
        backend.sign_up("a@b.com", "secret123").await.unwrap();

        let session = IdentitySession::new(backend);
        let user = session.sign_in("a@b.com", "secret123").await.unwrap();
        assert_eq!(session.current_user().map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn failed_sign_in_propagates_cause_and_keeps_session_empty() {
        let session = IdentitySession::new(backend());
        let err = session.sign_in("a@b.com", "secret123").await.unwrap_err();
        assert_eq!(err.cause, "invalid-credential");
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_locally() {
        let session = IdentitySession::new(backend());
        assert_eq!(
            session.sign_in("", "secret123").await.unwrap_err().cause,
            "missing-email"
        );
        assert_eq!(
            session.sign_up("a@b.com", "").await.unwrap_err().cause,
            "missing-password"
        );
    }

    #[tokio::test]
    async fn restore_reads_live_user() {
        let backend = backend();
        let user = backend.sign_up("a@b.com", "secret123").await.unwrap();
        let session = IdentitySession::restore(backend, user.id).await.unwrap();
        assert_eq!(session.current_user(), Some(user));
    }

    #[tokio::test]
    async fn restore_unknown_user_fails() {
        let err = IdentitySession::restore(backend(), UserId::new())
            .await
            .err()
            .unwrap();
        assert_eq!(err.cause, "user-not-found");
    }

    #[tokio::test]
    async fn reload_picks_up_backend_changes() {
        let session = IdentitySession::new(backend());
        let user = session.sign_up("a@b.com", "secret123").await.unwrap();
        session
            .backend()
            .update_profile(&user, ProfileChanges::display_name("alice"))
            .await
            .unwrap();

        let fresh = session.reload().await.unwrap().unwrap();
        assert_eq!(fresh.display_name.as_deref(), Some("alice"));
        assert_eq!(
            session.current_user().unwrap().display_name.as_deref(),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn sign_out_clears_current_user() {
        let session = IdentitySession::new(backend());
        session.sign_up("a@b.com", "secret123").await.unwrap();
        session.sign_out();
        assert!(session.current_user().is_none());
        assert!(session.reload().await.unwrap().is_none());
    }
}
