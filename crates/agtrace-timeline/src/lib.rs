//! Timeline presentation of batch histories.
//!
//! Pure functions from domain values to display-ready rows. Nothing here
//! talks to the ledger.

pub mod entry;
pub mod format;
pub mod summary;

pub use entry::{present, TimelineEntry, NO_DATA};
pub use format::format_timestamp;
pub use summary::{summarize, BatchSummary};
