//! Policy records, input loading and field sanitization

mod data;
pub mod loader;
pub mod sanitize;

pub use data::{RawRecord, RawValue, SanitizedRecord};
pub use loader::{load_records, load_records_from_reader};
pub use sanitize::{sanitize, sanitize_with_log, RepairLog, RepairSummary, CONFUSABLE_DIGITS};
