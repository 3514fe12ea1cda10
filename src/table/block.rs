//! # Grouped Block Storage
//!
//! The grouped physical layout: columns are partitioned into homogeneous
//! blocks keyed by element type, so a table with thousands of same-typed
//! columns stores them as a handful of dense blocks instead of one slot per
//! column. Positional access goes through the schema's precomputed
//! `(block, slot)` offsets and is O(1).
//!
//! ## Structure
//!
//! ```text
//! BlockTable
//! ├── schema: Arc<Schema>        (shared, immutable; owns the layout)
//! ├── blocks[0]: ColumnBlock     (all int64 columns, slot order = layout)
//! ├── blocks[1]: ColumnBlock     (all utf8 columns)
//! ├── ...
//! ├── nrows                      (row count, never recomputed from data)
//! └── host: Option<HostRef>      (present when mirroring a host object)
//! ```
//!
//! The block set is per-instance state; the layout that maps logical
//! columns onto it is schema-level metadata shared by every instance of the
//! same schema.

use std::sync::Arc;

use eyre::{ensure, Result};

use crate::error::TableError;
use crate::schema::Schema;
use crate::table::host::HostRef;
use crate::table::slot::ColumnSlot;
use crate::types::{ArrayRef, DataType};

/// A homogeneous, growable group of column slots sharing one element type.
#[derive(Debug, Clone)]
pub struct ColumnBlock {
    dtype: DataType,
    slots: Vec<ColumnSlot>,
}

impl ColumnBlock {
    pub fn new(dtype: DataType) -> Self {
        Self {
            dtype,
            slots: Vec::new(),
        }
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Number of columns mapped to this block.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, offset: usize) -> &ColumnSlot {
        &self.slots[offset]
    }

    pub fn slot_mut(&mut self, offset: usize) -> &mut ColumnSlot {
        &mut self.slots[offset]
    }

    fn push(&mut self, slot: ColumnSlot) {
        self.slots.push(slot);
    }
}

/// Grouped physical representation of a table.
#[derive(Debug, Clone)]
pub struct BlockTable {
    schema: Arc<Schema>,
    blocks: Vec<ColumnBlock>,
    nrows: usize,
    host: Option<HostRef>,
}

impl BlockTable {
    /// Builds a block table from materialized arrays in logical column
    /// order, grouping them per the schema's layout.
    pub fn from_arrays(schema: Arc<Schema>, arrays: Vec<ArrayRef>) -> Result<Self> {
        ensure!(
            arrays.len() == schema.column_count(),
            "expected {} arrays for schema {}, got {}",
            schema.column_count(),
            schema.describe(),
            arrays.len()
        );
        let nrows = arrays.first().map(|a| a.len()).unwrap_or(0);
        for (i, array) in arrays.iter().enumerate() {
            ensure!(
                array.data_type() == schema.dtype(i),
                "array for column '{}' has type {}, schema declares {}",
                schema.label(i),
                array.data_type(),
                schema.dtype(i)
            );
            ensure!(
                array.len() == nrows,
                "column '{}' has {} rows, expected {}",
                schema.label(i),
                array.len(),
                nrows
            );
        }
        let slots = arrays.into_iter().map(ColumnSlot::Ready).collect();
        Ok(Self::from_slots(schema, slots, nrows, None))
    }

    /// Builds a block table from slots in logical column order. Blocks are
    /// allocated and filled in the schema's declared block order.
    pub fn from_slots(
        schema: Arc<Schema>,
        slots: Vec<ColumnSlot>,
        nrows: usize,
        host: Option<HostRef>,
    ) -> Self {
        debug_assert_eq!(slots.len(), schema.column_count());
        let layout = schema.layout();
        let mut slots: Vec<Option<ColumnSlot>> = slots.into_iter().map(Some).collect();
        let mut blocks = Vec::with_capacity(layout.block_count());
        for b in 0..layout.block_count() {
            let mut block = ColumnBlock::new(layout.block_dtype(b));
            for &col in layout.columns_of_block(b) {
                block.push(slots[col].take().expect("logical column placed twice"));
            }
            blocks.push(block);
        }
        Self {
            schema,
            blocks,
            nrows,
            host,
        }
    }

    /// Builds a block table whose columns are all pending materialization
    /// from the given host object.
    pub fn pending(schema: Arc<Schema>, nrows: usize, host: HostRef) -> Self {
        let slots = vec![ColumnSlot::Pending; schema.column_count()];
        Self::from_slots(schema, slots, nrows, Some(host))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    pub fn host(&self) -> Option<&HostRef> {
        self.host.as_ref()
    }

    /// Detaches the host reference, transferring it to the caller.
    pub fn take_host(&mut self) -> Option<HostRef> {
        self.host.take()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, b: usize) -> &ColumnBlock {
        &self.blocks[b]
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.schema.column_count() {
            return Err(TableError::InvalidColumnIndex {
                index: i,
                column_count: self.schema.column_count(),
            }
            .into());
        }
        Ok(())
    }

    /// Slot of logical column `i`, resolved through the layout offsets.
    pub fn slot(&self, i: usize) -> Result<&ColumnSlot> {
        self.check_index(i)?;
        let (block, offset) = self.schema.layout().location(i);
        Ok(self.blocks[block].slot(offset))
    }

    pub fn slot_mut(&mut self, i: usize) -> Result<&mut ColumnSlot> {
        self.check_index(i)?;
        let (block, offset) = self.schema.layout().location(i);
        Ok(self.blocks[block].slot_mut(offset))
    }

    /// Overwrites logical column `i` in place. The replacement's element
    /// type must exactly equal the schema's declared type; retyping goes
    /// through a full-table rebuild instead.
    pub fn replace(&mut self, i: usize, array: ArrayRef) -> Result<()> {
        self.check_index(i)?;
        if array.data_type() != self.schema.dtype(i) {
            return Err(TableError::TypeMismatch {
                column: self.schema.label(i),
                expected: self.schema.dtype(i),
                actual: array.data_type(),
            }
            .into());
        }
        let (block, offset) = self.schema.layout().location(i);
        *self.blocks[block].slot_mut(offset) = ColumnSlot::Ready(array);
        Ok(())
    }

    /// Clones the slots back into logical column order.
    pub fn logical_slots(&self) -> Vec<ColumnSlot> {
        (0..self.schema.column_count())
            .map(|i| {
                let (block, offset) = self.schema.layout().location(i);
                self.blocks[block].slot(offset).clone()
            })
            .collect()
    }
}
