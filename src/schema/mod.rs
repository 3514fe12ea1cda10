//! # Schema and Block Layout
//!
//! This module provides the `Schema` struct that defines the logical shape
//! of a table — column names, per-column element types, and the derived
//! block layout — plus `BlockLayout`, the precomputed grouping of logical
//! columns into homogeneous per-type blocks.
//!
//! ## Schema Internals
//!
//! - `names`: logical column names, or `None` when names are determined at
//!   runtime and stored as data inside the table payload
//! - `dtypes`: per-column element type
//! - `dist`: opaque distribution tag, carried through rebuilds and casts
//!   verbatim, never interpreted
//! - `layout`: the derived [`BlockLayout`]
//!
//! A schema is computed once per distinct (names, dtypes) pair and shared as
//! `Arc<Schema>` wherever a block table is built or read. It is metadata,
//! not per-instance state: no table ever mutates its schema; retyping a
//! column or appending one derives a fresh schema.
//!
//! ## Block Layout
//!
//! Columns sharing an element type are grouped into one block. Block ids
//! are assigned in first-seen order of distinct dtypes over the logical
//! column order, which makes layout assignment deterministic — including
//! when several previously-unseen types are appended in sequence. The
//! layout pre-computes, per logical column, the `(block, slot)` pair that
//! gives O(1) access into the grouped representation.
//!
//! ```text
//! dtypes:   [int64, utf8, int64, float64, utf8]
//!
//! block 0 (int64):   slots [col 0, col 2]
//! block 1 (utf8):    slots [col 1, col 4]
//! block 2 (float64): slots [col 3]
//!
//! block_nums:    [0, 1, 0, 2, 1]
//! block_offsets: [0, 0, 1, 0, 1]
//! ```

use std::sync::Arc;

use eyre::Result;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::INLINE_BLOCK_COLUMNS;
use crate::error::TableError;
use crate::types::DataType;

/// Per-block list of logical column indices.
pub type BlockColumns = SmallVec<[usize; INLINE_BLOCK_COLUMNS]>;

/// Precomputed grouping of logical columns into per-type blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    block_dtypes: Vec<DataType>,
    block_nums: Vec<usize>,
    block_offsets: Vec<usize>,
    block_to_cols: Vec<BlockColumns>,
}

impl BlockLayout {
    /// Computes the layout for a dtype sequence. Block ids are assigned in
    /// first-seen order of distinct dtypes.
    pub fn compute(dtypes: &[DataType]) -> Self {
        let mut block_ids: HashMap<DataType, usize> = HashMap::new();
        let mut block_dtypes = Vec::new();
        let mut block_nums = Vec::with_capacity(dtypes.len());
        let mut block_offsets = Vec::with_capacity(dtypes.len());
        let mut block_to_cols: Vec<BlockColumns> = Vec::new();

        for (col, &dtype) in dtypes.iter().enumerate() {
            let block = *block_ids.entry(dtype).or_insert_with(|| {
                block_dtypes.push(dtype);
                block_to_cols.push(BlockColumns::new());
                block_dtypes.len() - 1
            });
            block_nums.push(block);
            block_offsets.push(block_to_cols[block].len());
            block_to_cols[block].push(col);
        }

        Self {
            block_dtypes,
            block_nums,
            block_offsets,
            block_to_cols,
        }
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.block_dtypes.len()
    }

    /// Element type stored in block `b`.
    pub fn block_dtype(&self, b: usize) -> DataType {
        self.block_dtypes[b]
    }

    /// `(block, slot)` location of logical column `i`.
    pub fn location(&self, i: usize) -> (usize, usize) {
        (self.block_nums[i], self.block_offsets[i])
    }

    /// Logical column indices stored in block `b`, in slot order.
    pub fn columns_of_block(&self, b: usize) -> &[usize] {
        &self.block_to_cols[b]
    }
}

/// Immutable logical schema: column names, element types, block layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    names: Option<Vec<String>>,
    dtypes: Vec<DataType>,
    dist: Option<String>,
    layout: BlockLayout,
}

impl Schema {
    /// Creates a static-name schema. Fails with a schema mismatch when the
    /// name and dtype counts differ.
    pub fn new(names: Vec<String>, dtypes: Vec<DataType>) -> Result<Arc<Schema>> {
        if names.len() != dtypes.len() {
            return Err(TableError::SchemaMismatch {
                columns: dtypes.len(),
                names: names.len(),
            }
            .into());
        }
        let layout = BlockLayout::compute(&dtypes);
        Ok(Arc::new(Schema {
            names: Some(names),
            dtypes,
            dist: None,
            layout,
        }))
    }

    /// Creates a runtime-columns schema: element types are known, names are
    /// stored as data in the table payload.
    pub fn runtime(dtypes: Vec<DataType>) -> Arc<Schema> {
        let layout = BlockLayout::compute(&dtypes);
        Arc::new(Schema {
            names: None,
            dtypes,
            dist: None,
            layout,
        })
    }

    /// Attaches an opaque distribution tag.
    pub fn with_dist(self: &Arc<Schema>, dist: impl Into<String>) -> Arc<Schema> {
        let mut schema = (**self).clone();
        schema.dist = Some(dist.into());
        Arc::new(schema)
    }

    /// Derives a schema with column `i`'s dtype replaced. The block layout
    /// is recomputed since block membership is type-keyed.
    pub fn with_dtype_replaced(self: &Arc<Schema>, i: usize, dtype: DataType) -> Arc<Schema> {
        let mut dtypes = self.dtypes.clone();
        dtypes[i] = dtype;
        let layout = BlockLayout::compute(&dtypes);
        Arc::new(Schema {
            names: self.names.clone(),
            dtypes,
            dist: self.dist.clone(),
            layout,
        })
    }

    /// Derives a schema with a new column appended at the end.
    pub fn with_column_appended(
        self: &Arc<Schema>,
        name: impl Into<String>,
        dtype: DataType,
    ) -> Result<Arc<Schema>> {
        let mut names = match &self.names {
            Some(names) => names.clone(),
            None => {
                return Err(TableError::RuntimeColumnsUnsupported {
                    operation: "appending a named column",
                }
                .into())
            }
        };
        names.push(name.into());
        let mut dtypes = self.dtypes.clone();
        dtypes.push(dtype);
        let layout = BlockLayout::compute(&dtypes);
        Ok(Arc::new(Schema {
            names: Some(names),
            dtypes,
            dist: self.dist.clone(),
            layout,
        }))
    }

    pub fn column_count(&self) -> usize {
        self.dtypes.len()
    }

    pub fn dtype(&self, i: usize) -> DataType {
        self.dtypes[i]
    }

    pub fn dtypes(&self) -> &[DataType] {
        &self.dtypes
    }

    /// Name of column `i`, or `None` in runtime-columns mode.
    pub fn name(&self, i: usize) -> Option<&str> {
        self.names.as_ref().map(|names| names[i].as_str())
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Position of a column by name, or `None` if absent (or runtime mode).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names
            .as_ref()
            .and_then(|names| names.iter().position(|n| n == name))
    }

    pub fn has_runtime_cols(&self) -> bool {
        self.names.is_none()
    }

    /// Display label for column `i`: its name, or a positional fallback.
    pub fn label(&self, i: usize) -> String {
        match self.name(i) {
            Some(name) => name.to_string(),
            None => format!("#{}", i),
        }
    }

    /// Opaque distribution tag.
    pub fn dist(&self) -> Option<&str> {
        self.dist.as_deref()
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Human-readable schema summary for error messages, naming dtypes and
    /// column labels.
    pub fn describe(&self) -> String {
        let dtypes: Vec<&str> = self.dtypes.iter().map(|d| d.name()).collect();
        match &self.names {
            Some(names) => format!("({}) columns ({})", dtypes.join(", "), names.join(", ")),
            None => format!("({}) with runtime columns", dtypes.join(", ")),
        }
    }
}
