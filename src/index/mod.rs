//! # Row Index
//!
//! This module provides `RowIndex`, the row-labeling capability attached to
//! every table. The table core only relies on four operations — length,
//! positional element access, name, and copy — so any concrete index kind
//! satisfying those is acceptable; the kinds here cover the common cases.
//!
//! ## Index Kinds
//!
//! | Kind | Storage | Element |
//! |------|---------|---------|
//! | Range | start/stop/step triple | computed int |
//! | Int64 | materialized i64 vector | stored int |
//! | Utf8 | materialized string vector | stored text |
//!
//! Indexes are shared between tables as `Arc<RowIndex>`; attaching one to a
//! payload clones the Arc and payload teardown drops it.

use eyre::{ensure, Result};

use crate::types::Scalar;

/// Row index attached to a table: range, int64, or string labels.
#[derive(Debug, Clone, PartialEq)]
pub enum RowIndex {
    Range {
        start: i64,
        stop: i64,
        step: i64,
        name: Option<String>,
    },
    Int64 {
        values: Vec<i64>,
        name: Option<String>,
    },
    Utf8 {
        values: Vec<String>,
        name: Option<String>,
    },
}

impl RowIndex {
    /// Creates a range index over `[start, stop)` with positive `step`.
    pub fn range(start: i64, stop: i64, step: i64) -> Result<Self> {
        ensure!(step > 0, "range index step must be positive, got {}", step);
        Ok(RowIndex::Range {
            start,
            stop,
            step,
            name: None,
        })
    }

    /// Creates a materialized int64 index.
    pub fn int64(values: impl Into<Vec<i64>>) -> Self {
        RowIndex::Int64 {
            values: values.into(),
            name: None,
        }
    }

    /// Creates a materialized string index.
    pub fn utf8<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowIndex::Utf8 {
            values: values.into_iter().map(Into::into).collect(),
            name: None,
        }
    }

    /// Attaches a name, consuming self.
    pub fn named(mut self, new_name: impl Into<String>) -> Self {
        let slot = match &mut self {
            RowIndex::Range { name, .. } => name,
            RowIndex::Int64 { name, .. } => name,
            RowIndex::Utf8 { name, .. } => name,
        };
        *slot = Some(new_name.into());
        self
    }

    /// Number of rows covered by the index.
    pub fn len(&self) -> usize {
        match self {
            RowIndex::Range {
                start, stop, step, ..
            } => {
                if stop <= start {
                    0
                } else {
                    ((stop - start + step - 1) / step) as usize
                }
            }
            RowIndex::Int64 { values, .. } => values.len(),
            RowIndex::Utf8 { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the label at position `i`.
    pub fn get(&self, i: usize) -> Result<Scalar<'_>> {
        ensure!(
            i < self.len(),
            "index position {} out of range {}",
            i,
            self.len()
        );
        Ok(match self {
            RowIndex::Range { start, step, .. } => Scalar::Int(start + step * i as i64),
            RowIndex::Int64 { values, .. } => Scalar::Int(values[i]),
            RowIndex::Utf8 { values, .. } => Scalar::Str(values[i].as_str().into()),
        })
    }

    /// Index name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            RowIndex::Range { name, .. } => name.as_deref(),
            RowIndex::Int64 { name, .. } => name.as_deref(),
            RowIndex::Utf8 { name, .. } => name.as_deref(),
        }
    }

    /// Deep copy of the index. Part of the consumed capability surface:
    /// callers that need an index detached from sharing use this rather
    /// than cloning the Arc.
    pub fn copy(&self) -> RowIndex {
        self.clone()
    }
}
