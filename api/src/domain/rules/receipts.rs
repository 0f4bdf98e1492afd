//! Receipt upload acceptance rules
//!
//! A receipt is accepted only when its declared MIME type and its file
//! extension both name an allowed format, and it fits the size limit.

use crate::error::DomainError;

/// Default upper bound for a receipt upload (10 MiB)
pub const DEFAULT_MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// Accepted receipt format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptKind {
    Jpeg,
    Png,
    Pdf,
}

impl ReceiptKind {
    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ReceiptKind::Jpeg),
            "image/png" => Some(ReceiptKind::Png),
            "application/pdf" => Some(ReceiptKind::Pdf),
            _ => None,
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ReceiptKind::Jpeg),
            "png" => Some(ReceiptKind::Png),
            "pdf" => Some(ReceiptKind::Pdf),
            _ => None,
        }
    }

    /// Extension used for the stored file
    pub fn extension(&self) -> &'static str {
        match self {
            ReceiptKind::Jpeg => "jpg",
            ReceiptKind::Png => "png",
            ReceiptKind::Pdf => "pdf",
        }
    }
}

/// An uploaded receipt as received from the client
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Check an upload against the allowed formats and size limit
pub fn validate_receipt(upload: &ReceiptUpload, max_bytes: usize) -> Result<ReceiptKind, DomainError> {
    if upload.bytes.is_empty() {
        return Err(DomainError::Validation("ملف الإيصال فارغ".to_string()));
    }

    if upload.bytes.len() > max_bytes {
        return Err(DomainError::Validation(format!(
            "حجم ملف الإيصال يتجاوز الحد المسموح ({} ميغابايت)",
            max_bytes / (1024 * 1024)
        )));
    }

    let by_extension = std::path::Path::new(&upload.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ReceiptKind::from_extension);
    let by_mime = ReceiptKind::from_mime(&upload.content_type);

    match (by_mime, by_extension) {
        (Some(kind), Some(ext_kind)) if kind == ext_kind => Ok(kind),
        _ => Err(DomainError::Validation(
            "يُسمح فقط بملفات الصور (JPEG, PNG) و PDF".to_string(),
        )),
    }
}
