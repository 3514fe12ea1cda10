//! # Table Error Taxonomy
//!
//! This module defines the typed errors raised by the table core. Every
//! variant is fatal to the operation that raised it: construction and casts
//! are copy-then-swap, so a failed operation leaves the source table
//! untouched.
//!
//! Errors are reported through [`eyre::Report`] at the public API boundary,
//! so call sites see a human-readable message naming the offending column
//! and the types or schemas involved, while tests and callers that need the
//! category can downcast:
//!
//! ```ignore
//! let err = table.set_column(0, bad).unwrap_err();
//! assert!(matches!(
//!     err.downcast_ref::<TableError>(),
//!     Some(TableError::TypeMismatch { .. })
//! ));
//! ```

use std::error::Error;
use std::fmt;

use crate::types::DataType;

/// Typed errors for table construction, access, mutation, and casting.
#[derive(Debug)]
pub enum TableError {
    /// Column/name count mismatch at construction.
    SchemaMismatch { columns: usize, names: usize },
    /// Out-of-range logical column index.
    InvalidColumnIndex { index: usize, column_count: usize },
    /// In-place column replacement with a differing element type.
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },
    /// No coercion exists between a source/target column type pair.
    InvalidCast { from: String, to: String },
    /// Operation requires statically-known column names.
    RuntimeColumnsUnsupported { operation: &'static str },
    /// Column slot holds no data: deleted, or the host produced none.
    ColumnUnavailable { column: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::SchemaMismatch { columns, names } => write!(
                f,
                "number of column names ({}) does not match number of columns ({})",
                names, columns
            ),
            TableError::InvalidColumnIndex {
                index,
                column_count,
            } => write!(
                f,
                "column index {} is out of range for a table with {} columns",
                index, column_count
            ),
            TableError::TypeMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "changing column '{}' type in place from {} to {} is unsupported; \
                 re-type the whole table through a cast instead",
                column,
                expected.name(),
                actual.name()
            ),
            TableError::InvalidCast { from, to } => {
                write!(f, "invalid table cast from {} to {}", from, to)
            }
            TableError::RuntimeColumnsUnsupported { operation } => write!(
                f,
                "{} on tables with columns determined at runtime is not supported; \
                 materialize the table back to a static schema first",
                operation
            ),
            TableError::ColumnUnavailable { column } => {
                write!(f, "column '{}' holds no data", column)
            }
        }
    }
}

impl Error for TableError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_names_both_counts() {
        let err = TableError::SchemaMismatch {
            columns: 2,
            names: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn type_mismatch_names_column_and_types() {
        let err = TableError::TypeMismatch {
            column: "x".to_string(),
            expected: DataType::Int64,
            actual: DataType::Utf8,
        };
        let msg = err.to_string();
        assert!(msg.contains("'x'"));
        assert!(msg.contains("int64"));
        assert!(msg.contains("utf8"));
    }

    #[test]
    fn errors_downcast_through_eyre() {
        let report: eyre::Report = TableError::InvalidColumnIndex {
            index: 5,
            column_count: 2,
        }
        .into();
        assert!(matches!(
            report.downcast_ref::<TableError>(),
            Some(TableError::InvalidColumnIndex { index: 5, .. })
        ));
    }
}
