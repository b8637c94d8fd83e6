//! Filesystem object store scoped to one directory capability.
//!
//! Objects are written to a hidden temporary file beside the target and
//! renamed into place, so readers never observe a partial PDF. Blocking
//! filesystem calls run on Tokio's blocking pool.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;
use uuid::Uuid;

use crate::domain::StorageKey;
use crate::domain::ports::{ObjectStore, ObjectStoreError};

/// Object store writing documents beneath a root directory.
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    root: Arc<Dir>,
    public_base_url: String,
}

impl FilesystemObjectStore {
    /// Open (creating if needed) `root` and serve objects under
    /// `public_base_url`.
    pub fn open(root: &Path, public_base_url: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self::from_dir(dir, public_base_url))
    }

    /// Wrap an already opened directory capability.
    pub fn from_dir(dir: Dir, public_base_url: impl Into<String>) -> Self {
        Self {
            root: Arc::new(dir),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    async fn run_blocking<F>(&self, key: &StorageKey, op: F) -> Result<(), ObjectStoreError>
    where
        F: FnOnce(&Dir, &Path) -> io::Result<()> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        let relative = PathBuf::from(key.as_str());
        let key_name = key.to_string();
        tokio::task::spawn_blocking(move || op(&root, &relative))
            .await
            .map_err(|err| ObjectStoreError::connection(format!("storage task failed: {err}")))?
            .map_err(|err| ObjectStoreError::write(key_name, err.to_string()))
    }
}

fn write_atomically(dir: &Dir, target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        dir.create_dir_all(parent)?;
    }
    let file_name = target.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "storage key has no file name")
    })?;
    let staged = target.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4().simple()
    ));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let written = dir.open_with(&staged, &options).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|()| dir.rename(&staged, dir, target)) {
        drop(dir.remove_file(&staged));
        return Err(err);
    }
    Ok(())
}

fn remove_if_present(dir: &Dir, target: &Path) -> io::Result<()> {
    match dir.remove_file(target) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), ObjectStoreError> {
        let bytes = bytes.to_vec();
        let size = bytes.len();
        self.run_blocking(key, move |dir, target| write_atomically(dir, target, &bytes))
            .await?;
        debug!(storage_key = %key, size, "object stored");
        Ok(())
    }

    async fn delete(&self, key: &StorageKey) -> Result<(), ObjectStoreError> {
        self.run_blocking(key, remove_if_present).await?;
        debug!(storage_key = %key, "object removed");
        Ok(())
    }

    fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}
