use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use profilesync_shared::error::AuthError;
use profilesync_shared::identity::{ProfileChanges, UserIdentity};
use profilesync_shared::ids::UserId;
use rand::Rng;

use crate::validation::{check_display_name, check_password_strength, normalize_email};

/// Capability contract of the identity backend.
///
/// Every failure carries the backend's own cause string; callers propagate it
/// verbatim and never retry.
#[async_trait::async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError>;
    /// Re-read the live record for `id`.
    async fn get_user(&self, id: UserId) -> Result<UserIdentity, AuthError>;
    async fn update_profile(
        &self,
        user: &UserIdentity,
        changes: ProfileChanges,
    ) -> Result<UserIdentity, AuthError>;
    async fn update_password(&self, user: &UserIdentity, new_password: &str)
        -> Result<(), AuthError>;
}

struct UserRecord {
    identity: UserIdentity,
    password_hash: String,
    disabled: bool,
}

/// In-process identity backend: users in a `DashMap`, Argon2id password hashes.
pub struct LocalIdentityBackend {
    users: DashMap<UserId, UserRecord>,
    /// Lower-cased email -> user. Reserved before the user record is inserted.
    emails: DashMap<String, UserId>,
    hash_params: Params,
}

impl Default for LocalIdentityBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityBackend {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            hash_params: Params::default(),
        }
    }

    /// Override the Argon2 cost parameters used for new password hashes.
    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.hash_params = params;
        self
    }

    /// Disable an account. Later sign-ins and lookups fail with `user-disabled`.
    pub fn disable(&self, id: UserId) -> Result<(), AuthError> {
        let mut record = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AuthError::new("user-not-found"))?;
        record.disabled = true;
        tracing::info!(user_id = %id, "identity: account disabled");
        Ok(())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let params = self.hash_params.clone();
        tokio::task::spawn_blocking(move || hash_password_blocking(&password, params))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "identity: password hashing task failed");
                AuthError::new("internal-error")
            })?
    }
}

fn hash_password_blocking(password: &str, params: Params) -> Result<String, AuthError> {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt).map_err(|e| {
        tracing::error!(error = %e, "identity: salt encoding failed");
        AuthError::new("internal-error")
    })?;
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "identity: password hashing failed");
            AuthError::new("internal-error")
        })
}

fn verify_password_blocking(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "identity: stored password hash is malformed");
            false
        }
    }
}

#[async_trait::async_trait]
impl IdentityBackend for LocalIdentityBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let email = normalize_email(email)?;
        let user_id = self
            .emails
            .get(&email)
            .map(|entry| *entry.value())
            .ok_or_else(|| AuthError::new("invalid-credential"))?;

        let (hash, disabled) = {
            let record = self
                .users
                .get(&user_id)
                .ok_or_else(|| AuthError::new("invalid-credential"))?;
            (record.password_hash.clone(), record.disabled)
        };

        let password = password.to_string();
        let matches =
            tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "identity: password verify task failed");
                    AuthError::new("internal-error")
                })?;
        if !matches {
            tracing::debug!(user_id = %user_id, "identity: wrong password");
            return Err(AuthError::new("invalid-credential"));
        }
        if disabled {
            return Err(AuthError::new("user-disabled"));
        }

        self.get_user(user_id).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let email = normalize_email(email)?;
        check_password_strength(password)?;
        let password_hash = self.hash_password(password).await?;

        let id = UserId::new();
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => return Err(AuthError::new("email-already-in-use")),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = chrono::Utc::now();
        let identity = UserIdentity {
            id,
            email,
            display_name: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(
            id,
            UserRecord {
                identity: identity.clone(),
                password_hash,
                disabled: false,
            },
        );
        tracing::info!(user_id = %id, "identity: account created");
        Ok(identity)
    }

    async fn get_user(&self, id: UserId) -> Result<UserIdentity, AuthError> {
        let record = self
            .users
            .get(&id)
            .ok_or_else(|| AuthError::new("user-not-found"))?;
        if record.disabled {
            return Err(AuthError::new("user-disabled"));
        }
        Ok(record.identity.clone())
    }

    async fn update_profile(
        &self,
        user: &UserIdentity,
        changes: ProfileChanges,
    ) -> Result<UserIdentity, AuthError> {
        if let Some(name) = &changes.display_name {
            check_display_name(name)?;
        }
        let mut record = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AuthError::new("user-not-found"))?;
        if record.disabled {
            return Err(AuthError::new("user-disabled"));
        }
        if let Some(name) = changes.display_name {
            record.identity.display_name = Some(name);
        }
        if let Some(url) = changes.avatar_url {
            record.identity.avatar_url = Some(url);
        }
        record.identity.updated_at = chrono::Utc::now();
        Ok(record.identity.clone())
    }

    async fn update_password(
        &self,
        user: &UserIdentity,
        new_password: &str,
    ) -> Result<(), AuthError> {
        check_password_strength(new_password)?;
        if !self.users.contains_key(&user.id) {
            return Err(AuthError::new("user-not-found"));
        }
        let password_hash = self.hash_password(new_password).await?;

        let mut record = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AuthError::new("user-not-found"))?;
        if record.disabled {
            return Err(AuthError::new("user-disabled"));
        }
        record.password_hash = password_hash;
        record.identity.updated_at = chrono::Utc::now();
        Ok(())
    }
}
