//! Blob store seam for uploaded media files.
//!
//! The core only ever keeps the reference a [`BlobStore`] hands back.
//! [`LocalBlobStore`] writes files under a directory and returns URLs under
//! a public base path; other backends implement the same trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid blob reference: {0}")]
    InvalidReference(String),
}

/// Storage for uploaded file payloads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` and return a stable reference (URL) to them.
    async fn put(&self, extension: &str, bytes: &[u8]) -> Result<String, BlobError>;

    /// Remove the blob behind `reference`. Removing a missing blob succeeds.
    async fn delete(&self, reference: &str) -> Result<(), BlobError>;
}

/// Filesystem-backed blob store.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    /// Files are written to `root` and referenced as `{base_url}/{key}`.
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference back to its file, rejecting anything that is not a
    /// plain key under this store's base URL.
    fn path_for(&self, reference: &str) -> Result<PathBuf, BlobError> {
        let key = reference
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty() && !key.contains(['/', '\\']) && !key.contains(".."))
            .ok_or_else(|| BlobError::InvalidReference(reference.to_string()))?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, extension: &str, bytes: &[u8]) -> Result<String, BlobError> {
        let extension: String = extension
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        let key = format!("{}.{}", Uuid::new_v4(), extension.to_lowercase());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&key), bytes).await?;
        tracing::debug!(key = %key, size = bytes.len(), "Blob stored");

        Ok(format!("{}/{key}", self.base_url))
    }

    async fn delete(&self, reference: &str) -> Result<(), BlobError> {
        let path = self.path_for(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(reference, "Blob deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
