//! # Table Core Constants
//!
//! This module centralizes the sentinel and sizing constants used across the
//! table core, grouping interdependent values together and documenting their
//! relationships.
//!
//! ## Dependency Graph
//!
//! ```text
//! NAT (i64::MIN)
//!       │
//!       └─> Datetime64 null probing and allocation both compare against
//!           this exact value. A coercion writing any other sentinel would
//!           make a null datetime read as present.
//!
//! CATEGORICAL_NULL_CODE (-1)
//!       │
//!       └─> Categorical null probing accepts ANY negative code, but
//!           allocators and coercions write this canonical value so that
//!           equality comparisons between freshly allocated arrays hold.
//!
//! INLINE_BLOCK_COLUMNS (8)
//!       │
//!       └─> Inline capacity of the per-block logical-column lists in
//!           BlockLayout. Blocks with more columns spill to the heap.
//! ```
//!
//! ## Critical Invariants
//!
//! These invariants are enforced by compile-time assertions:
//!
//! 1. `NAT == i64::MIN` (outside the range of real timestamps)
//! 2. `CATEGORICAL_NULL_CODE < 0` (probing treats negatives as null)
//!
//! ## Usage
//!
//! Import constants from this module rather than defining them locally:
//!
//! ```ignore
//! use crate::config::{NAT, CATEGORICAL_NULL_CODE};
//! ```

/// Not-a-time sentinel for `Datetime64` arrays (nanoseconds since epoch).
pub const NAT: i64 = i64::MIN;

/// Canonical null code written into `Categorical` arrays.
///
/// Any negative code reads as null; this is the value writers produce.
pub const CATEGORICAL_NULL_CODE: i32 = -1;

/// Inline capacity for per-block logical-column lists.
///
/// Eight covers the common case of a handful of same-typed columns per
/// table; wider blocks spill to the heap.
pub const INLINE_BLOCK_COLUMNS: usize = 8;

const _: () = assert!(NAT == i64::MIN);
const _: () = assert!(CATEGORICAL_NULL_CODE < 0);
const _: () = assert!(INLINE_BLOCK_COLUMNS > 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nat_is_minimum_i64() {
        assert_eq!(NAT, i64::MIN);
    }

    #[test]
    fn categorical_null_code_is_negative() {
        assert!(CATEGORICAL_NULL_CODE < 0);
    }
}
