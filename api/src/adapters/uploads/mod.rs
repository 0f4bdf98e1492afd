//! Receipt file storage adapters

pub mod local;

pub use local::{LocalReceiptStore, UPLOADS_URL_PREFIX};
