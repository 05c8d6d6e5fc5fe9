//! Catalog domain records.
//!
//! # Responsibility
//! - Define row-shaped records for products, tags, categories and SKUs.
//! - Define inbound forms and outbound views exchanged with callers.
//!
//! # Invariants
//! - Identifiers are assigned by storage, never by callers.
//! - Timestamps are Unix epoch milliseconds.
//! - Soft deletion is an explicit `RecordStatus`, never an implicit scope.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod category;
pub mod form;
pub mod product;
pub mod sku;
pub mod tag;
pub mod view;

/// Lifecycle marker for rows that support soft deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    /// Retired row kept for history; excluded from current queries.
    Deleted,
}

impl RecordStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Clamps to `0` if the system clock reports a pre-epoch instant.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, RecordStatus};

    #[test]
    fn now_is_after_2020() {
        assert!(now_epoch_ms() > 1_577_836_800_000);
    }

    #[test]
    fn record_status_defaults_to_active() {
        assert!(RecordStatus::default().is_active());
        assert!(!RecordStatus::Deleted.is_active());
    }
}
