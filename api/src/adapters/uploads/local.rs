//! Local-disk receipt storage
//!
//! Files are written as `<uuid>.<ext>` under the upload directory and served
//! by the router under `/uploads/`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::ReceiptStore;
use crate::domain::rules::ReceiptKind;
use crate::error::DomainError;

/// URL prefix the upload directory is mounted under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// ReceiptStore writing into a directory on the local filesystem
pub struct LocalReceiptStore {
    dir: PathBuf,
}

impl LocalReceiptStore {
    /// Create the store, creating `dir` if it does not exist yet
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::Internal(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a stored URL back to its file, refusing anything outside the directory
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(UPLOADS_URL_PREFIX)?.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[async_trait]
impl ReceiptStore for LocalReceiptStore {
    async fn store(&self, kind: ReceiptKind, bytes: &[u8]) -> Result<String, DomainError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Internal(format!("write {}: {}", path.display(), e)))?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Stored receipt");
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }

    async fn remove(&self, url: &str) -> Result<(), DomainError> {
        let Some(path) = self.path_for_url(url) else {
            tracing::warn!(url, "Refusing to remove receipt outside upload directory");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(format!(
                "remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
