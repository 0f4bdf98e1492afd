//! Domain rules
//!
//! Pure, stateless business rules. Services feed them validated input and
//! the aggregates read from storage; nothing here performs I/O.

pub mod finance;
pub mod period;
pub mod permissions;
pub mod receipts;
pub mod subscription;

pub use finance::{DashboardStats, FinancialStatus, LedgerTotals};
pub use period::DateWindow;
pub use permissions::Permission;
pub use receipts::{validate_receipt, ReceiptKind, ReceiptUpload, DEFAULT_MAX_RECEIPT_BYTES};
pub use subscription::ExpiryStatus;
