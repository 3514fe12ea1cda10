//! # Column Slots
//!
//! A slot is the per-table owner of one logical column's storage. Slots are
//! tri-state so that "not yet pulled from the host" is distinguishable from
//! "the host legitimately produced nothing":
//!
//! - `Pending`: the column has not been materialized from the host object;
//!   the first read triggers a fetch
//! - `Ready`: the column is materialized and owned by this slot
//! - `Missing`: the column was deleted, or the host returned no data;
//!   reads fail instead of re-fetching

use crate::types::ArrayRef;

/// Tri-state owner of one logical column's storage.
#[derive(Debug, Clone, Default)]
pub enum ColumnSlot {
    /// Not yet materialized from the host object.
    #[default]
    Pending,
    /// Materialized and owned.
    Ready(ArrayRef),
    /// Deleted, or the host produced no data. Terminal.
    Missing,
}

impl ColumnSlot {
    /// The materialized array, if any.
    pub fn as_ready(&self) -> Option<&ArrayRef> {
        match self {
            ColumnSlot::Ready(array) => Some(array),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ColumnSlot::Pending)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ColumnSlot::Missing)
    }
}
