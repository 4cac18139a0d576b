use std::sync::Arc;

use object_store::ObjectStore;
use profilesync_shared::error::ProfileSyncError;

use crate::config::ServerConfig;
use crate::identity::IdentityBackend;
use crate::jwt::JwtService;
use crate::profile::ProfileUpdateOrchestrator;
use crate::storage::ObjectStoreBlobs;

/// Shared application state passed to all handlers via Axum's State extractor.
///
/// Every field is Arc-wrapped so cloning `AppState` is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub jwt: Arc<JwtService>,
    pub identity: Arc<dyn IdentityBackend>,
    pub object_store: Arc<dyn ObjectStore>,
    pub profiles: Arc<ProfileUpdateOrchestrator>,
}

impl AppState {
    /// Wire the orchestrator and token service around the given backends.
    pub fn new(
        config: ServerConfig,
        identity: Arc<dyn IdentityBackend>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Result<Self, ProfileSyncError> {
        let jwt = Arc::new(JwtService::new(&config.jwt)?);
        let blobs = Arc::new(ObjectStoreBlobs::new(
            object_store.clone(),
            config.public_base_url.clone(),
        ));
        let profiles = Arc::new(
            ProfileUpdateOrchestrator::new(identity.clone(), blobs)
                .with_max_avatar_bytes(config.storage.max_file_size_bytes),
        );
        Ok(Self {
            config: Arc::new(config),
            jwt,
            identity,
            object_store,
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityBackend;
    use crate::jwt::tests::test_jwt_config;

    #[test]
    fn test_app_state_implements_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_requires_valid_jwt_keys() {
        let result = AppState::new(
            ServerConfig::default(),
            Arc::new(LocalIdentityBackend::new()),
            Arc::new(object_store::memory::InMemory::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_app_state_builds_with_test_keys() {
        let config = ServerConfig {
            jwt: test_jwt_config(),
            ..ServerConfig::default()
        };
        let state = AppState::new(
            config,
            Arc::new(LocalIdentityBackend::new()),
            Arc::new(object_store::memory::InMemory::new()),
        );
        assert!(state.is_ok());
    }
}
