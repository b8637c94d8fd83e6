//! Port for the object store holding uploaded PDF bytes.

use async_trait::async_trait;

use crate::domain::StorageKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object store adapters.
    pub enum ObjectStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "object store connection failed: {message}",
        /// Writing or removing an object failed.
        Write { key: String, message: String } =>
            "object store write for {key} failed: {message}",
    }
}

/// Port for storing and releasing document bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object.
    async fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), ObjectStoreError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &StorageKey) -> Result<(), ObjectStoreError>;

    /// Public URL viewers fetch the PDF from.
    fn public_url(&self, key: &StorageKey) -> String;
}

/// Fixture implementation that accepts every write and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureObjectStore;

#[async_trait]
impl ObjectStore for FixtureObjectStore {
    async fn put(&self, _key: &StorageKey, _bytes: &[u8]) -> Result<(), ObjectStoreError> {
        Ok(())
    }

    async fn delete(&self, _key: &StorageKey) -> Result<(), ObjectStoreError> {
        Ok(())
    }

    fn public_url(&self, key: &StorageKey) -> String {
        format!("/files/{key}")
    }
}

#[cfg(test)]
mod tests {
    //! Fixture behaviour.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_accepts_writes() {
        let key = StorageKey::new("owner/doc.pdf").expect("valid key");
        FixtureObjectStore
            .put(&key, b"%PDF-1.7")
            .await
            .expect("fixture put succeeds");
        FixtureObjectStore
            .delete(&key)
            .await
            .expect("fixture delete succeeds");
        assert_eq!(FixtureObjectStore.public_url(&key), "/files/owner/doc.pdf");
    }

    #[rstest]
    fn write_error_names_the_key() {
        let err = ObjectStoreError::write("owner/doc.pdf", "disk full");
        assert_eq!(
            err.to_string(),
            "object store write for owner/doc.pdf failed: disk full"
        );
    }
}
