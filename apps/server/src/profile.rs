//! Profile-edit orchestration.
//!
//! One `apply` call runs up to three independent stages, always in the order
//! avatar, display name, password. A stage that fails is recorded as
//! `UpdateOutcome::Failed` and the remaining stages still run. Nothing is
//! retried. Concurrent calls for the same user race at the backend; callers
//! that care must serialise them. Dropping the future mid-stage leaves that
//! stage's backend effect up to the backend.

use std::sync::Arc;

use profilesync_shared::constants::MAX_AVATAR_SIZE_BYTES;
use profilesync_shared::error::{ProfileSyncError, ValidationError};
use profilesync_shared::identity::{ProfileChanges, UserIdentity};
use profilesync_shared::profile::{
    AvatarPayload, ProfileEditRequest, ProfileUpdateResult, Stage, StageFailure, UpdateOutcome,
};

use crate::identity::IdentityBackend;
use crate::session::IdentitySession;
use crate::storage::{avatar_key, BlobStore};

pub struct ProfileUpdateOrchestrator {
    identity: Arc<dyn IdentityBackend>,
    blobs: Arc<dyn BlobStore>,
    max_avatar_bytes: usize,
}

impl ProfileUpdateOrchestrator {
    pub fn new(identity: Arc<dyn IdentityBackend>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            identity,
            blobs,
            max_avatar_bytes: MAX_AVATAR_SIZE_BYTES,
        }
    }

    pub fn with_max_avatar_bytes(mut self, max: usize) -> Self {
        self.max_avatar_bytes = max;
        self
    }

    /// Apply `request` to `user`.
    ///
    /// Per-stage errors never escape; they become `Failed` outcomes. The only
    /// error is `NoActiveSession`: a change was requested with no user handle.
    pub async fn apply(
        &self,
        user: Option<&UserIdentity>,
        request: ProfileEditRequest,
    ) -> Result<ProfileUpdateResult, ProfileSyncError> {
        let (result, _) = self.run(user, request).await?;
        Ok(result)
    }

    /// Apply `request` to the session's current user, then refresh the session
    /// so `current_user()` reflects what was applied. If the refresh fails the
    /// session keeps the handle returned by the last successful stage.
    pub async fn apply_for_session(
        &self,
        session: &IdentitySession,
        request: ProfileEditRequest,
    ) -> Result<ProfileUpdateResult, ProfileSyncError> {
        let user = session.current_user();
        let (result, latest) = self.run(user.as_ref(), request).await?;
        if let Some(latest) = latest {
            if let Err(e) = session.reload().await {
                tracing::warn!(
                    user_id = %latest.id,
                    error = %e,
                    "profile: session reload after update failed, keeping stage handle"
                );
                session.set_current(Some(latest));
            }
        }
        Ok(result)
    }

    /// Run every stage, returning the outcomes and the freshest user handle.
    async fn run(
        &self,
        user: Option<&UserIdentity>,
        request: ProfileEditRequest,
    ) -> Result<(ProfileUpdateResult, Option<UserIdentity>), ProfileSyncError> {
        let Some(user) = user else {
            if request.is_empty() {
                return Ok((ProfileUpdateResult::skipped(), None));
            }
            tracing::error!("profile: change requested without a signed-in user");
            return Err(ProfileSyncError::NoActiveSession);
        };

        let ProfileEditRequest {
            display_name,
            new_password,
            confirm_password,
            avatar,
        } = request;

        // Later stages compare against the freshest handle we have.
        let mut current = user.clone();

        let avatar = match avatar {
            None => UpdateOutcome::Skipped,
            Some(payload) => record(&mut current, self.update_avatar(user, payload).await),
        };
        log_outcome(&current, Stage::Avatar, &avatar);

        let display_name = if display_name.is_empty()
            || current.display_name.as_deref() == Some(display_name.as_str())
        {
            UpdateOutcome::Skipped
        } else {
            let updated = self
                .identity
                .update_profile(&current, ProfileChanges::display_name(display_name))
                .await
                .map_err(StageFailure::from);
            record(&mut current, updated)
        };
        log_outcome(&current, Stage::DisplayName, &display_name);

        let password = self
            .update_password(&current, &new_password, &confirm_password)
            .await;
        log_outcome(&current, Stage::Password, &password);

        let result = ProfileUpdateResult {
            avatar,
            display_name,
            password,
        };
        Ok((result, Some(current)))
    }

    /// Upload, resolve the URL, then associate it with the profile. The first
    /// failing sub-step decides the outcome.
    async fn update_avatar(
        &self,
        user: &UserIdentity,
        payload: AvatarPayload,
    ) -> Result<UserIdentity, StageFailure> {
        if payload.bytes.len() > self.max_avatar_bytes {
            return Err(ValidationError::AvatarTooLarge {
                max: self.max_avatar_bytes,
            }
            .into());
        }

        let key = avatar_key(&user.id);
        self.blobs
            .upload(&key, payload.bytes, payload.content_type.as_deref())
            .await?;
        let url = self.blobs.resolve_url(&key).await?;
        let updated = self
            .identity
            .update_profile(user, ProfileChanges::avatar_url(url))
            .await?;
        Ok(updated)
    }

    async fn update_password(
        &self,
        user: &UserIdentity,
        new_password: &str,
        confirm_password: &str,
    ) -> UpdateOutcome {
        if new_password.is_empty() {
            return UpdateOutcome::Skipped;
        }
        if new_password != confirm_password {
            return UpdateOutcome::failed(ValidationError::PasswordMismatch);
        }
        match self.identity.update_password(user, new_password).await {
            Ok(()) => UpdateOutcome::Applied,
            Err(e) => UpdateOutcome::failed(e),
        }
    }
}

/// Turn a stage result into its outcome, adopting the returned handle.
fn record(
    current: &mut UserIdentity,
    result: Result<UserIdentity, StageFailure>,
) -> UpdateOutcome {
    match result {
        Ok(updated) => {
            *current = updated;
            UpdateOutcome::Applied
        }
        Err(failure) => UpdateOutcome::Failed(failure),
    }
}

fn log_outcome(user: &UserIdentity, stage: Stage, outcome: &UpdateOutcome) {
    match outcome {
        UpdateOutcome::Skipped => {
            tracing::debug!(user_id = %user.id, %stage, "profile: stage skipped");
        }
        UpdateOutcome::Applied => {
            tracing::info!(user_id = %user.id, %stage, "profile: stage applied");
        }
        UpdateOutcome::Failed(failure) => {
            tracing::warn!(
                user_id = %user.id,
                %stage,
                kind = ?failure.kind,
                cause = %failure.cause,
                "profile: stage failed"
            );
        }
    }
}
