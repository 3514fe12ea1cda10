//! # Physical Element Types
//!
//! This module provides the canonical `DataType` enum for the table core,
//! used across schema definitions, block layout computation, and casts.
//!
//! ## Design Principles
//!
//! 1. **Single source of truth**: One DataType enum used everywhere
//! 2. **Storage-efficient**: `#[repr(u8)]` for single-byte discriminant
//! 3. **Block keying**: Two columns share a block exactly when their
//!    DataTypes are equal, so equality here IS the grouping relation
//!
//! ## Type Categories
//!
//! | Category | Types | Null Encoding |
//! |----------|-------|---------------|
//! | **Numeric** | Int64, Float64 | none / NaN |
//! | **Nullable numeric** | NullableInt64 | validity bitmap |
//! | **Boolean** | Boolean | validity bitmap |
//! | **Text** | Utf8 | validity bitmap |
//! | **Categorical** | Categorical | negative code |
//! | **Datetime** | Datetime64 | NAT sentinel |
//!
//! ## Coercions
//!
//! `can_coerce_to` is the admissibility table consulted by the cast engine
//! before any per-column work starts, so an undefined pair fails the whole
//! cast up front and the source table is never touched.

use eyre::Result;

/// Canonical element type for column arrays.
///
/// Uses `#[repr(u8)]` for efficient single-byte storage encoding. Equality
/// of two DataTypes is the block-grouping relation: columns land in the same
/// block exactly when their types are equal.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int64 = 0,
    Float64 = 1,
    NullableInt64 = 2,
    Boolean = 3,
    Utf8 = 4,
    Categorical = 5,
    Datetime64 = 6,
}

impl DataType {
    /// Returns the lowercase name used in error messages and schema dumps.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::NullableInt64 => "nullable_int64",
            DataType::Boolean => "boolean",
            DataType::Utf8 => "utf8",
            DataType::Categorical => "categorical",
            DataType::Datetime64 => "datetime64",
        }
    }

    /// Returns true if the type can represent missing values.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, DataType::Int64)
    }

    /// Returns true if a column of this type can be coerced to `target`.
    ///
    /// Identity is always admissible. The non-trivial pairs mirror the
    /// conversions [`crate::types::Array::coerce`] implements; the two
    /// tables must stay in sync.
    pub fn can_coerce_to(&self, target: DataType) -> bool {
        if *self == target {
            return true;
        }
        matches!(
            (*self, target),
            (DataType::Int64, DataType::Float64)
                | (DataType::Int64, DataType::NullableInt64)
                | (DataType::NullableInt64, DataType::Float64)
                | (DataType::NullableInt64, DataType::Int64)
                | (DataType::Datetime64, DataType::Int64)
                | (DataType::Int64, DataType::Datetime64)
                | (DataType::Categorical, DataType::Int64)
        )
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for DataType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(DataType::Int64),
            1 => Ok(DataType::Float64),
            2 => Ok(DataType::NullableInt64),
            3 => Ok(DataType::Boolean),
            4 => Ok(DataType::Utf8),
            5 => Ok(DataType::Categorical),
            6 => Ok(DataType::Datetime64),
            _ => eyre::bail!("invalid DataType discriminant: {}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_coercion_always_allowed() {
        for dt in [
            DataType::Int64,
            DataType::Float64,
            DataType::NullableInt64,
            DataType::Boolean,
            DataType::Utf8,
            DataType::Categorical,
            DataType::Datetime64,
        ] {
            assert!(dt.can_coerce_to(dt));
        }
    }

    #[test]
    fn int_widens_to_float_and_nullable() {
        assert!(DataType::Int64.can_coerce_to(DataType::Float64));
        assert!(DataType::Int64.can_coerce_to(DataType::NullableInt64));
    }

    #[test]
    fn utf8_does_not_coerce_to_numeric() {
        assert!(!DataType::Utf8.can_coerce_to(DataType::Int64));
        assert!(!DataType::Int64.can_coerce_to(DataType::Utf8));
    }

    #[test]
    fn discriminant_roundtrip() {
        for raw in 0..=6u8 {
            let dt = DataType::try_from(raw).unwrap();
            assert_eq!(dt as u8, raw);
        }
        assert!(DataType::try_from(7).is_err());
    }

    #[test]
    fn int64_is_the_only_non_nullable_type() {
        assert!(!DataType::Int64.is_nullable());
        assert!(DataType::Float64.is_nullable());
        assert!(DataType::Utf8.is_nullable());
    }
}
