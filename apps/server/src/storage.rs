use std::sync::Arc;

use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use profilesync_shared::constants::{AVATAR_OBJECT_NAME, AVATAR_PREFIX};
use profilesync_shared::error::StorageError;
use profilesync_shared::ids::UserId;

use crate::config::FileStorageConfig;

/// Capability contract of the object store used for avatar images.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `key`, replacing whatever was there.
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;
    /// Stable retrieval URL for an existing object.
    async fn resolve_url(&self, key: &str) -> Result<String, StorageError>;
}

/// Object key of a user's avatar. One key per user, so uploads overwrite.
pub fn avatar_key(user_id: &UserId) -> String {
    format!("{AVATAR_PREFIX}/{user_id}/{AVATAR_OBJECT_NAME}")
}

/// Creates an ObjectStore backend from the file storage configuration.
///
/// - `"local"` backend: creates directory if needed, uses `LocalFileSystem`
/// - `"memory"` backend: uses `InMemory` (for testing)
pub fn create_object_store(
    config: &FileStorageConfig,
) -> Result<Arc<dyn ObjectStore>, Box<dyn std::error::Error>> {
    match config.backend.as_str() {
        "local" => {
            std::fs::create_dir_all(&config.local_path)?;
            let store = LocalFileSystem::new_with_prefix(&config.local_path)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(InMemory::new())),
        other => Err(format!("unknown file storage backend: {other}").into()),
    }
}

/// `BlobStore` over any `object_store` backend. URLs point at this server's
/// `/media` route.
pub struct ObjectStoreBlobs {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl ObjectStoreBlobs {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            public_base_url,
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for ObjectStoreBlobs {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        let path = StorePath::from(key);
        let payload = PutPayload::from(bytes);

        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(Attribute::ContentType, content_type.to_string().into());
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let result = match self.store.put_opts(&path, payload.clone(), opts).await {
            // LocalFileSystem keeps no attributes; store the bytes alone.
            Err(object_store::Error::NotImplemented) => {
                tracing::debug!(key, "object store ignores attributes, storing bytes only");
                self.store.put(&path, payload).await
            }
            other => other,
        };
        result.map_err(|e| {
            tracing::error!(error = %e, key, "object store put failed");
            StorageError::new(format!("upload failed: {e}"))
        })?;
        Ok(())
    }

    async fn resolve_url(&self, key: &str) -> Result<String, StorageError> {
        let path = StorePath::from(key);
        match self.store.head(&path).await {
            Ok(_) => Ok(format!("{}/media/{}", self.public_base_url, path)),
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::new("object-not-found"))
            }
            Err(e) => {
                tracing::error!(error = %e, key, "object store head failed");
                Err(StorageError::new(format!("url resolution failed: {e}")))
            }
        }
    }
}
