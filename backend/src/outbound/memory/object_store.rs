//! In-memory object store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::StorageKey;
use crate::domain::ports::{ObjectStore, ObjectStoreError};

/// Object store keeping bytes in a map.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<StorageKey, Vec<u8>>>,
    public_base_url: String,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new("/files")
    }
}

impl InMemoryObjectStore {
    /// Create an empty store whose public URLs start with `public_base_url`.
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Mutex::default(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Bytes stored under `key`, if any.
    pub fn get(&self, key: &StorageKey) -> Option<Vec<u8>> {
        self.guard().ok()?.get(key).cloned()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.guard().map(|guard| guard.len()).unwrap_or_default()
    }

    /// Return true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<StorageKey, Vec<u8>>>, ObjectStoreError> {
        self.objects
            .lock()
            .map_err(|_| ObjectStoreError::connection("object store poisoned"))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), ObjectStoreError> {
        self.guard()?.insert(key.clone(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), ObjectStoreError> {
        self.guard()?.remove(key);
        Ok(())
    }

    fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}
