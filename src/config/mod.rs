//! # Configuration Module
//!
//! This module centralizes the sentinel values and sizing constants for the
//! table core. Constants are grouped by their functional area and
//! interdependencies are documented and enforced through compile-time
//! assertions.
//!
//! ## Why Centralization?
//!
//! The null sentinels for datetime and categorical data are observable in
//! stored values: they must agree between array construction, null probing,
//! and coercion, or the same value can flip between "null" and "present"
//! depending on which module inspects it. Co-locating them with compile-time
//! checks prevents such drift.
//!
//! ## Module Organization
//!
//! - [`constants`]: All sentinel and sizing values with dependency notes

pub mod constants;
pub use constants::*;
