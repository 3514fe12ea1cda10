//! # Table Payload and Handle
//!
//! `TablePayload` is the shared heap record holding a table's actual data:
//! one of the two physical layouts, the row index, the optional host
//! back-reference, and (in runtime-columns mode) the column-name array.
//! `Table` is the lightweight handle: a shared pointer to the payload plus a
//! mirrored host reference for fast probing.
//!
//! ## Ownership
//!
//! ```text
//! Table ──┬── Option<Arc<RwLock<TablePayload>>>   (None = unbound sentinel)
//!         └── Option<HostRef>                     (mirror of payload.host)
//!
//! TablePayload
//! ├── data: TableData            Grouped(BlockTable) | Flat(TupleTable)
//! ├── index: Arc<RowIndex>       shared; dropped with the payload
//! ├── host: Option<HostRef>      released under the host lock on drop
//! └── runtime_names: Option<ArrayRef>
//! ```
//!
//! Multiple handles may alias one payload; the payload's `Drop` is the
//! single place its columns, index and host reference are released, and it
//! runs exactly once when the last handle goes away. Full-table rebuilds
//! construct a fresh payload and hand back a new handle (copy-then-swap);
//! only same-type column replacement mutates a payload in place.
//!
//! ## The Unbound Sentinel
//!
//! A default-constructed handle has no payload at all. `len` treats it as
//! an empty table instead of dereferencing, covering unused default-valued
//! table slots.

use std::sync::Arc;

use eyre::{ensure, Result};
use parking_lot::RwLock;

use crate::error::TableError;
use crate::index::RowIndex;
use crate::schema::Schema;
use crate::table::block::BlockTable;
use crate::table::host::{HostRef, HostSync};
use crate::table::slot::ColumnSlot;
use crate::table::tuple::TupleTable;
use crate::types::ArrayRef;

/// The two mutually exclusive physical layouts of a table.
#[derive(Debug, Clone)]
pub enum TableData {
    Grouped(BlockTable),
    Flat(TupleTable),
}

impl TableData {
    pub fn schema(&self) -> &Arc<Schema> {
        match self {
            TableData::Grouped(table) => table.schema(),
            TableData::Flat(table) => table.schema(),
        }
    }

    pub fn nrows(&self) -> usize {
        match self {
            TableData::Grouped(table) => table.nrows(),
            TableData::Flat(table) => table.nrows(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.schema().column_count()
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, TableData::Grouped(_))
    }

    pub fn slot(&self, i: usize) -> Result<&ColumnSlot> {
        match self {
            TableData::Grouped(table) => table.slot(i),
            TableData::Flat(table) => table.slot(i),
        }
    }

    pub fn slot_mut(&mut self, i: usize) -> Result<&mut ColumnSlot> {
        match self {
            TableData::Grouped(table) => table.slot_mut(i),
            TableData::Flat(table) => table.slot_mut(i),
        }
    }

    /// In-place column replacement; exact element type required.
    pub fn replace(&mut self, i: usize, array: ArrayRef) -> Result<()> {
        match self {
            TableData::Grouped(table) => table.replace(i, array),
            TableData::Flat(table) => table.replace(i, array),
        }
    }

    /// Clones the slots back into logical column order.
    pub fn logical_slots(&self) -> Vec<ColumnSlot> {
        match self {
            TableData::Grouped(table) => table.logical_slots(),
            TableData::Flat(table) => table.logical_slots(),
        }
    }

    /// Rebuilds the same layout kind from logical-order slots under a new
    /// schema.
    pub fn rebuild(&self, schema: Arc<Schema>, slots: Vec<ColumnSlot>, nrows: usize) -> TableData {
        match self {
            TableData::Grouped(_) => {
                TableData::Grouped(BlockTable::from_slots(schema, slots, nrows, None))
            }
            TableData::Flat(_) => TableData::Flat(TupleTable::from_slots(schema, slots, nrows)),
        }
    }
}

/// The reference-counted record holding a table's data, index, and optional
/// host back-reference.
#[derive(Debug)]
pub struct TablePayload {
    data: TableData,
    index: Arc<RowIndex>,
    host: Option<HostRef>,
    runtime_names: Option<ArrayRef>,
}

impl TablePayload {
    pub fn new(
        data: TableData,
        index: Arc<RowIndex>,
        host: Option<HostRef>,
        runtime_names: Option<ArrayRef>,
    ) -> Self {
        Self {
            data,
            index,
            host,
            runtime_names,
        }
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut TableData {
        &mut self.data
    }

    pub fn index(&self) -> &Arc<RowIndex> {
        &self.index
    }

    pub fn host(&self) -> Option<&HostRef> {
        self.host.as_ref()
    }

    pub fn runtime_names(&self) -> Option<&ArrayRef> {
        self.runtime_names.as_ref()
    }

    /// Returns column `i`'s array, pulling it from the host object on first
    /// access.
    ///
    /// - `Ready` slots hand back a shared reference.
    /// - `Pending` slots with a live host fetch under the host lock, then
    ///   store the result; a host that produces no data makes the slot
    ///   terminally `Missing`.
    /// - `Missing` slots (and `Pending` without a host) fail.
    pub(crate) fn materialize(&mut self, i: usize) -> Result<ArrayRef> {
        match self.data.slot(i)? {
            ColumnSlot::Ready(array) => return Ok(array.clone()),
            ColumnSlot::Missing => {
                return Err(TableError::ColumnUnavailable {
                    column: self.data.schema().label(i),
                }
                .into())
            }
            ColumnSlot::Pending => {}
        }
        let fetched = match &self.host {
            Some(host) => HostSync::with_lock(|| host.object().fetch_column(i))?,
            None => None,
        };
        match fetched {
            Some(array) => {
                let schema = self.data.schema();
                ensure!(
                    array.data_type() == schema.dtype(i),
                    "host produced type {} for column '{}', schema declares {}",
                    array.data_type(),
                    schema.label(i),
                    schema.dtype(i)
                );
                ensure!(
                    array.len() == self.data.nrows(),
                    "host produced {} rows for column '{}', expected {}",
                    array.len(),
                    schema.label(i),
                    self.data.nrows()
                );
                let array = Arc::new(array);
                *self.data.slot_mut(i)? = ColumnSlot::Ready(array.clone());
                Ok(array)
            }
            None => {
                let column = self.data.schema().label(i);
                *self.data.slot_mut(i)? = ColumnSlot::Missing;
                Err(TableError::ColumnUnavailable { column }.into())
            }
        }
    }
}

/// Lightweight table handle. Cheap to clone; clones alias the same payload.
#[derive(Debug, Clone, Default)]
pub struct Table {
    payload: Option<Arc<RwLock<TablePayload>>>,
    host: Option<HostRef>,
}

impl Table {
    /// Wraps a freshly built payload in a new handle, mirroring its host
    /// reference for fast probing.
    pub fn from_payload(payload: TablePayload) -> Table {
        let host = payload.host().cloned();
        Table {
            payload: Some(Arc::new(RwLock::new(payload))),
            host,
        }
    }

    /// A handle bound to no storage at all. `len` is 0; every other
    /// operation fails.
    pub fn unbound() -> Table {
        Table::default()
    }

    pub(crate) fn alias(payload: Arc<RwLock<TablePayload>>, host: Option<HostRef>) -> Table {
        Table {
            payload: Some(payload),
            host,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.payload.is_some()
    }

    pub(crate) fn payload(&self) -> Result<&Arc<RwLock<TablePayload>>> {
        match &self.payload {
            Some(payload) => Ok(payload),
            None => eyre::bail!("table handle is unbound: no storage is attached"),
        }
    }

    /// Returns true if this handle mirrors a live host object.
    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    pub(crate) fn host(&self) -> Option<&HostRef> {
        self.host.as_ref()
    }

    /// Number of rows.
    ///
    /// An unbound handle reports 0 without touching storage. A table with
    /// zero columns is as long as its index; otherwise the stored row count
    /// is used — equal to every column's length by construction, never
    /// re-validated at read time.
    pub fn len(&self) -> usize {
        let Some(payload) = &self.payload else {
            return 0;
        };
        let guard = payload.read();
        if guard.data().column_count() == 0 {
            guard.index().len()
        } else {
            guard.data().nrows()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The row index.
    pub fn index(&self) -> Result<Arc<RowIndex>> {
        Ok(self.payload()?.read().index().clone())
    }

    /// The table's schema.
    pub fn schema(&self) -> Result<Arc<Schema>> {
        Ok(self.payload()?.read().data().schema().clone())
    }

    /// True if the payload currently holds the grouped layout.
    pub fn is_grouped(&self) -> Result<bool> {
        Ok(self.payload()?.read().data().is_grouped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Array, DataType};

    #[test]
    fn unbound_table_len_is_zero() {
        let table = Table::unbound();
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert!(!table.is_bound());
        assert!(table.index().is_err());
    }

    #[test]
    fn zero_column_table_uses_index_length() {
        let schema = Schema::new(vec![], vec![]).unwrap();
        let data = TableData::Flat(TupleTable::from_slots(schema, vec![], 0));
        let index = Arc::new(RowIndex::range(0, 5, 1).unwrap());
        let table = Table::from_payload(TablePayload::new(data, index, None, None));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn aliased_handles_share_a_payload() {
        let schema = Schema::new(vec!["a".into()], vec![DataType::Int64]).unwrap();
        let data = TableData::Flat(
            TupleTable::from_arrays(schema, vec![Arc::new(Array::int64(vec![1, 2]))]).unwrap(),
        );
        let index = Arc::new(RowIndex::range(0, 2, 1).unwrap());
        let table = Table::from_payload(TablePayload::new(data, index, None, None));
        let other = table.clone();
        assert!(Arc::ptr_eq(
            table.payload().unwrap(),
            other.payload().unwrap()
        ));
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn materialize_without_host_fails_for_pending() {
        let schema = Schema::new(vec!["a".into()], vec![DataType::Int64]).unwrap();
        let data = TableData::Flat(TupleTable::from_slots(schema, vec![ColumnSlot::Pending], 2));
        let index = Arc::new(RowIndex::range(0, 2, 1).unwrap());
        let mut payload = TablePayload::new(data, index, None, None);
        let err = payload.materialize(0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::ColumnUnavailable { .. })
        ));
    }
}
