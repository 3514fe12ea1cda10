//! # Flat Tuple Storage
//!
//! The flat physical layout: one slot per logical column, heterogeneous, in
//! declaration order. Simpler than the grouped layout and the default for
//! tables built directly from a tuple of arrays; the cast engine converts
//! between the two on demand.

use std::sync::Arc;

use eyre::{ensure, Result};

use crate::error::TableError;
use crate::schema::Schema;
use crate::table::slot::ColumnSlot;
use crate::types::ArrayRef;

/// Flat physical representation of a table.
#[derive(Debug, Clone)]
pub struct TupleTable {
    schema: Arc<Schema>,
    slots: Vec<ColumnSlot>,
    nrows: usize,
}

impl TupleTable {
    /// Builds a tuple table from materialized arrays in logical order.
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
        Ok(Self {
            schema,
            slots,
            nrows,
        })
    }

    /// Builds a tuple table from slots in logical order.
    pub fn from_slots(schema: Arc<Schema>, slots: Vec<ColumnSlot>, nrows: usize) -> Self {
        debug_assert_eq!(slots.len(), schema.column_count());
        Self {
            schema,
            slots,
            nrows,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn column_count(&self) -> usize {
        self.slots.len()
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.slots.len() {
            return Err(TableError::InvalidColumnIndex {
                index: i,
                column_count: self.slots.len(),
            }
            .into());
        }
        Ok(())
    }

    pub fn slot(&self, i: usize) -> Result<&ColumnSlot> {
        self.check_index(i)?;
        Ok(&self.slots[i])
    }

    pub fn slot_mut(&mut self, i: usize) -> Result<&mut ColumnSlot> {
        self.check_index(i)?;
        Ok(&mut self.slots[i])
    }

    /// Overwrites logical column `i` in place; exact element type required.
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
        self.slots[i] = ColumnSlot::Ready(array);
        Ok(())
    }

    /// Clones the slots in logical order.
    pub fn logical_slots(&self) -> Vec<ColumnSlot> {
        self.slots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Array, DataType};

    fn sample() -> TupleTable {
        let schema = Schema::new(
            vec!["x".into(), "y".into()],
            vec![DataType::Int64, DataType::Utf8],
        )
        .unwrap();
        TupleTable::from_arrays(
            schema,
            vec![
                Arc::new(Array::int64(vec![1, 2, 3])),
                Arc::new(Array::utf8(["a", "b", "c"])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn direct_slot_access() {
        let table = sample();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.nrows(), 3);
        assert_eq!(
            **table.slot(1).unwrap().as_ready().unwrap(),
            Array::utf8(["a", "b", "c"])
        );
    }

    #[test]
    fn replace_checks_type() {
        let mut table = sample();
        let err = table
            .replace(1, Arc::new(Array::int64(vec![1, 2, 3])))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn from_arrays_rejects_arity_mismatch() {
        let schema = Schema::new(vec!["x".into()], vec![DataType::Int64]).unwrap();
        let err = TupleTable::from_arrays(schema, vec![]).unwrap_err();
        assert!(err.to_string().contains("expected 1 arrays"));
    }
}
