//! # Table Operations
//!
//! The public construction and column-access surface of the table core.
//!
//! ## Construction
//!
//! Tables are always built through one of two entry points: from
//! materialized column arrays plus a row index ([`Table::init`] /
//! [`Table::init_grouped`]), or from a compile-time literal
//! ([`crate::table::fold_constant`]). Construction captures every column
//! and the index into a fresh payload by shared ownership.
//!
//! ## Mutation
//!
//! In-place mutation is restricted to same-type column replacement
//! ([`Table::set_column`]) and the same-type fast path of
//! [`Table::with_column`]; everything else — retyping a column, appending
//! one, replacing the index — builds a new payload and returns a new
//! handle, leaving the source untouched (copy-then-swap).
//!
//! ## Host Reflection
//!
//! On host-backed tables every write is pushed back into the host object
//! synchronously, inside the scoped host lock, so external aliases observe
//! the update. Reads of columns not yet pulled out of the host trigger a
//! one-time lazy fetch.

use std::sync::Arc;

use eyre::{ensure, Result};

use crate::error::TableError;
use crate::index::RowIndex;
use crate::schema::Schema;
use crate::table::block::BlockTable;
use crate::table::host::HostSync;
use crate::table::payload::{Table, TableData, TablePayload};
use crate::table::slot::ColumnSlot;
use crate::table::tuple::TupleTable;
use crate::types::{ArrayRef, DataType};

/// Column-name source for grouped construction.
#[derive(Debug)]
pub enum ColumnNames {
    /// Names fixed at schema definition time.
    Static(Vec<String>),
    /// Names determined at runtime, stored as a utf8 array in the payload.
    Runtime(ArrayRef),
}

impl Table {
    /// Builds a flat-layout table from columns in logical order, a row
    /// index, and column names ("init from data").
    ///
    /// The name count must equal the column count; every column must be as
    /// long as its siblings. Columns and the index are captured by shared
    /// ownership. The new table has no host back-reference.
    pub fn init(
        columns: Vec<ArrayRef>,
        index: impl Into<Arc<RowIndex>>,
        names: Vec<String>,
    ) -> Result<Table> {
        if names.len() != columns.len() {
            return Err(TableError::SchemaMismatch {
                columns: columns.len(),
                names: names.len(),
            }
            .into());
        }
        let dtypes: Vec<DataType> = columns.iter().map(|c| c.data_type()).collect();
        let schema = Schema::new(names, dtypes)?;
        let data = TableData::Flat(TupleTable::from_arrays(schema, columns)?);
        let payload = TablePayload::new(data, index.into(), None, None);
        Ok(Table::from_payload(payload))
    }

    /// Builds a grouped-layout table from an already-built block table
    /// ("init from data", grouped form).
    ///
    /// With [`ColumnNames::Static`] the block table is re-labeled under the
    /// given names; with [`ColumnNames::Runtime`] the names are themselves
    /// data and every name-dependent operation on the result fails until it
    /// is materialized back to a static schema. A host-backed block table
    /// propagates its host reference into the new payload.
    pub fn init_grouped(
        block_table: BlockTable,
        index: impl Into<Arc<RowIndex>>,
        names: ColumnNames,
    ) -> Result<Table> {
        let mut block_table = block_table;
        let host = block_table.take_host();
        let nrows = block_table.nrows();
        let dtypes = block_table.schema().dtypes().to_vec();
        match names {
            ColumnNames::Static(names) => {
                if names.len() != dtypes.len() {
                    return Err(TableError::SchemaMismatch {
                        columns: dtypes.len(),
                        names: names.len(),
                    }
                    .into());
                }
                let schema = Schema::new(names, dtypes)?;
                let slots = block_table.logical_slots();
                let data =
                    TableData::Grouped(BlockTable::from_slots(schema, slots, nrows, None));
                let payload = TablePayload::new(data, index.into(), host, None);
                Ok(Table::from_payload(payload))
            }
            ColumnNames::Runtime(name_array) => {
                ensure!(
                    name_array.data_type() == DataType::Utf8,
                    "runtime column names must be a utf8 array, got {}",
                    name_array.data_type()
                );
                ensure!(
                    name_array.len() == dtypes.len(),
                    "runtime column name array has {} entries for {} columns",
                    name_array.len(),
                    dtypes.len()
                );
                let schema = Schema::runtime(dtypes);
                let slots = block_table.logical_slots();
                let data =
                    TableData::Grouped(BlockTable::from_slots(schema, slots, nrows, None));
                let payload = TablePayload::new(data, index.into(), host, Some(name_array));
                Ok(Table::from_payload(payload))
            }
        }
    }

    fn check_static(&self, operation: &'static str) -> Result<()> {
        if self.schema()?.has_runtime_cols() {
            return Err(TableError::RuntimeColumnsUnsupported { operation }.into());
        }
        Ok(())
    }

    /// Reads logical column `i`, materializing it from the host object on
    /// first access.
    ///
    /// The returned reference shares ownership with the table; clone it to
    /// retain the column beyond the table's lifetime.
    pub fn column(&self, i: usize) -> Result<ArrayRef> {
        self.check_static("reading a column")?;
        let payload = self.payload()?;
        {
            let guard = payload.read();
            if let ColumnSlot::Ready(array) = guard.data().slot(i)? {
                return Ok(array.clone());
            }
        }
        payload.write().materialize(i)
    }

    /// Replaces logical column `i` in place.
    ///
    /// The replacement's element type must exactly equal the schema's
    /// declared type; retyping a column in place is rejected, the table is
    /// left unmodified, and the caller must re-type the whole table through
    /// a cast. On host-backed tables the write is pushed back into the host
    /// object under the scoped host lock.
    pub fn set_column(&self, i: usize, array: ArrayRef) -> Result<()> {
        self.check_static("replacing a column")?;
        let payload = self.payload()?;
        let mut guard = payload.write();
        ensure!(
            array.len() == guard.data().nrows(),
            "replacement for column '{}' has {} rows, table has {}",
            guard.data().schema().label(i),
            array.len(),
            guard.data().nrows()
        );
        guard.data_mut().replace(i, array.clone())?;
        if let Some(host) = guard.host() {
            let schema = guard.data().schema();
            let name = schema.label(i);
            HostSync::with_lock(|| host.object().store_column(&name, &array))?;
        }
        Ok(())
    }

    /// Appends a column, or replaces the one already carrying `name`.
    ///
    /// - Existing name, identical element type: in-place fast path; the
    ///   returned handle aliases this table's (now mutated) payload.
    /// - Existing name, differing type: full rebuild under a re-typed
    ///   schema (block membership is type-keyed); returns a new table and
    ///   leaves this one untouched.
    /// - New name: appends at the end; the column's type key joins its
    ///   existing block or allocates the next block id.
    ///
    /// All paths push the write back into a live host object.
    pub fn with_column(&self, name: &str, array: ArrayRef) -> Result<Table> {
        self.check_static("appending or replacing a named column")?;
        let payload = self.payload()?;
        let mut guard = payload.write();
        let schema = guard.data().schema().clone();
        let nrows = if schema.column_count() == 0 {
            array.len()
        } else {
            guard.data().nrows()
        };
        ensure!(
            array.len() == nrows,
            "column '{}' has {} rows, table has {}",
            name,
            array.len(),
            nrows
        );

        let result = match schema.position(name) {
            Some(i) if schema.dtype(i) == array.data_type() => {
                guard.data_mut().replace(i, array.clone())?;
                Table::alias(payload.clone(), self.host().cloned())
            }
            Some(i) => {
                let new_schema = schema.with_dtype_replaced(i, array.data_type());
                let mut slots = guard.data().logical_slots();
                slots[i] = ColumnSlot::Ready(array.clone());
                let data = guard.data().rebuild(new_schema, slots, nrows);
                let new_payload = TablePayload::new(
                    data,
                    guard.index().clone(),
                    guard.host().cloned(),
                    None,
                );
                Table::from_payload(new_payload)
            }
            None => {
                let new_schema = schema.with_column_appended(name, array.data_type())?;
                let mut slots = guard.data().logical_slots();
                slots.push(ColumnSlot::Ready(array.clone()));
                let data = guard.data().rebuild(new_schema, slots, nrows);
                let new_payload = TablePayload::new(
                    data,
                    guard.index().clone(),
                    guard.host().cloned(),
                    None,
                );
                Table::from_payload(new_payload)
            }
        };
        if let Some(host) = guard.host() {
            HostSync::with_lock(|| host.object().store_column(name, &array))?;
        }
        Ok(result)
    }

    /// Returns a new table over the same columns with a replaced row index.
    /// On host-backed tables the new index is pushed back into the host.
    pub fn with_index(&self, index: impl Into<Arc<RowIndex>>) -> Result<Table> {
        self.check_static("replacing the index")?;
        let payload = self.payload()?;
        let guard = payload.read();
        let index = index.into();
        let new_payload = TablePayload::new(
            guard.data().clone(),
            index.clone(),
            guard.host().cloned(),
            None,
        );
        if let Some(host) = guard.host() {
            HostSync::with_lock(|| host.object().store_index(&index))?;
        }
        Ok(Table::from_payload(new_payload))
    }

    /// Releases logical column `i`'s storage. The slot becomes terminally
    /// missing: the schema and row count are unchanged and later reads of
    /// this column fail.
    pub fn delete_column(&self, i: usize) -> Result<()> {
        let payload = self.payload()?;
        let mut guard = payload.write();
        *guard.data_mut().slot_mut(i)? = ColumnSlot::Missing;
        Ok(())
    }

    /// Materializes every column and returns them in logical order — the
    /// flattened array handoff consumed by external sinks.
    pub fn snapshot_arrays(&self) -> Result<Vec<ArrayRef>> {
        let payload = self.payload()?;
        let mut guard = payload.write();
        (0..guard.data().column_count())
            .map(|i| guard.materialize(i))
            .collect()
    }

    /// Number of columns of a runtime-columns table.
    pub fn num_runtime_columns(&self) -> Result<usize> {
        let schema = self.schema()?;
        ensure!(
            schema.has_runtime_cols(),
            "num_runtime_columns expects a table with runtime-determined columns"
        );
        Ok(schema.column_count())
    }

    /// The column-name array of a runtime-columns table.
    pub fn runtime_column_names(&self) -> Result<ArrayRef> {
        let payload = self.payload()?;
        let guard = payload.read();
        match guard.runtime_names() {
            Some(names) => Ok(names.clone()),
            None => eyre::bail!(
                "runtime_column_names expects a table with runtime-determined columns"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Array;

    fn small_table() -> Table {
        Table::init(
            vec![
                Arc::new(Array::int64(vec![1, 2, 3])),
                Arc::new(Array::utf8(["a", "b", "c"])),
            ],
            RowIndex::range(0, 3, 1).unwrap(),
            vec!["x".into(), "y".into()],
        )
        .unwrap()
    }

    #[test]
    fn init_rejects_name_count_mismatch() {
        let err = Table::init(
            vec![
                Arc::new(Array::int64(vec![1])),
                Arc::new(Array::utf8(["a"])),
            ],
            RowIndex::range(0, 1, 1).unwrap(),
            vec!["a".into(), "b".into(), "c".into()],
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::SchemaMismatch {
                columns: 2,
                names: 3
            })
        ));
    }

    #[test]
    fn column_read_is_shared_not_copied() {
        let table = small_table();
        let first = table.column(0).unwrap();
        let second = table.column(0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn set_column_same_type_in_place() {
        let table = small_table();
        let replacement = Arc::new(Array::int64(vec![9, 9, 9]));
        table.set_column(0, replacement.clone()).unwrap();
        assert!(Arc::ptr_eq(&table.column(0).unwrap(), &replacement));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn set_column_type_mismatch_leaves_table_unmodified() {
        let table = small_table();
        let before = table.column(0).unwrap();
        let err = table
            .set_column(0, Arc::new(Array::float64(vec![1.0, 2.0, 3.0])))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::TypeMismatch { .. })
        ));
        assert!(Arc::ptr_eq(&table.column(0).unwrap(), &before));
    }

    #[test]
    fn with_column_same_name_same_type_replaces_in_place() {
        let table = small_table();
        let col = Arc::new(Array::utf8(["p", "q", "r"]));
        let result = table.with_column("y", col.clone()).unwrap();
        assert_eq!(result.schema().unwrap().column_count(), 2);
        // Both handles observe the mutation: same payload.
        assert!(Arc::ptr_eq(&table.column(1).unwrap(), &col));
        assert!(Arc::ptr_eq(&result.column(1).unwrap(), &col));
    }

    #[test]
    fn with_column_new_name_appends() {
        let table = small_table();
        let col = Arc::new(Array::float64(vec![0.5, 0.25, 0.125]));
        let result = table.with_column("z", col.clone()).unwrap();
        assert_eq!(result.schema().unwrap().column_count(), 3);
        assert!(Arc::ptr_eq(&result.column(2).unwrap(), &col));
        // Source table is unaffected.
        assert_eq!(table.schema().unwrap().column_count(), 2);
    }

    #[test]
    fn with_column_retype_rebuilds() {
        let table = small_table();
        let col = Arc::new(Array::float64(vec![1.0, 2.0, 3.0]));
        let result = table.with_column("x", col.clone()).unwrap();
        assert_eq!(result.schema().unwrap().dtype(0), DataType::Float64);
        assert!(Arc::ptr_eq(&result.column(0).unwrap(), &col));
        // Source keeps its original type and data.
        assert_eq!(table.schema().unwrap().dtype(0), DataType::Int64);
        assert_eq!(*table.column(0).unwrap(), Array::int64(vec![1, 2, 3]));
    }

    #[test]
    fn with_index_shares_columns() {
        let table = small_table();
        let relabeled = table
            .with_index(RowIndex::int64(vec![10, 20, 30]).named("id"))
            .unwrap();
        assert_eq!(relabeled.index().unwrap().name(), Some("id"));
        assert!(Arc::ptr_eq(
            &table.column(0).unwrap(),
            &relabeled.column(0).unwrap()
        ));
    }

    #[test]
    fn delete_column_makes_reads_fail() {
        let table = small_table();
        table.delete_column(1).unwrap();
        assert_eq!(table.len(), 3);
        let err = table.column(1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::ColumnUnavailable { .. })
        ));
        // Other columns are unaffected.
        assert!(table.column(0).is_ok());
    }

    #[test]
    fn snapshot_returns_logical_order() {
        let table = small_table();
        let arrays = table.snapshot_arrays().unwrap();
        assert_eq!(*arrays[0], Array::int64(vec![1, 2, 3]));
        assert_eq!(*arrays[1], Array::utf8(["a", "b", "c"]));
    }
}
