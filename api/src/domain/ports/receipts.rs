//! Receipt file storage port

use async_trait::async_trait;

use crate::domain::rules::ReceiptKind;
use crate::error::DomainError;

/// Stores accepted receipt files and hands back their public URL
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persist `bytes` and return the URL the file is served under
    async fn store(&self, kind: ReceiptKind, bytes: &[u8]) -> Result<String, DomainError>;

    /// Remove a previously stored file by URL (used to undo a failed write)
    async fn remove(&self, url: &str) -> Result<(), DomainError>;
}
