//! # Cast Engine
//!
//! Converts a table between its two physical layouts and/or between
//! almost-identical schemas whose per-column element types differ. The
//! conversion is an exhaustive match over the four
//! `(source layout, target layout)` cases:
//!
//! 1. **Same layout, same types** — share: every slot is passed through by
//!    reference, no per-column work
//! 2. **Flat → Grouped** — allocate the target's blocks and fill them in
//!    the target schema's declared block order
//! 3. **Grouped → Flat** — walk the target's logical column order, pulling
//!    each column out of its source block
//! 4. **Grouped → Grouped with differing type keys** — per-column move
//!    between two different block layouts, iterating target block order
//!
//! Per column: an unchanged element type passes the slot through by
//! reference (including still-pending and missing slots); a changed type
//! first ensures the column is materialized from any host object, then
//! coerces into a freshly allocated array.
//!
//! ## Failure Mode
//!
//! Admissibility is checked for every column pair before any allocation, so
//! an undefined coercion fails the whole cast up front, naming both
//! schemas. Casts are copy-then-swap: the source payload is never edited
//! (beyond one-time lazy materialization), so a failed cast leaves the
//! source table exactly as it was.

use eyre::{Result, WrapErr};

use std::sync::Arc;

use crate::error::TableError;
use crate::schema::Schema;
use crate::table::block::BlockTable;
use crate::table::payload::{Table, TableData, TablePayload};
use crate::table::slot::ColumnSlot;
use crate::table::tuple::TupleTable;

/// Target physical layout of a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Grouped,
    Flat,
}

impl Table {
    /// Casts this table to a target schema and physical layout, returning a
    /// new table; the source remains valid and unchanged.
    pub fn cast(&self, target: &Arc<Schema>, layout: LayoutKind) -> Result<Table> {
        let payload = self.payload()?;
        let mut guard = payload.write();
        let source = guard.data().schema().clone();
        if source.has_runtime_cols() || target.has_runtime_cols() {
            return Err(TableError::RuntimeColumnsUnsupported {
                operation: "casting",
            }
            .into());
        }
        if source.column_count() != target.column_count() {
            return Err(invalid_cast(&source, target).into());
        }
        for i in 0..source.column_count() {
            if !source.dtype(i).can_coerce_to(target.dtype(i)) {
                return Err(invalid_cast(&source, target).into());
            }
        }

        let nrows = guard.data().nrows();
        let ncols = source.column_count();
        let same_types = source.dtypes() == target.dtypes();

        // Case 1: same layout, same per-column types. Share every slot.
        let source_grouped = guard.data().is_grouped();
        let target_grouped = layout == LayoutKind::Grouped;
        let data = if same_types && source_grouped == target_grouped {
            guard
                .data()
                .rebuild(target.clone(), guard.data().logical_slots(), nrows)
        } else {
            // Cases 2-4: per-column pass in the target's declared order.
            // Grouped targets walk the target block order; flat targets walk
            // logical order (which IS the flat layout's declared order).
            let mut slots: Vec<Option<ColumnSlot>> = (0..ncols).map(|_| None).collect();
            let column_order: Vec<usize> = if target_grouped {
                let target_layout = target.layout();
                (0..target_layout.block_count())
                    .flat_map(|b| target_layout.columns_of_block(b).iter().copied())
                    .collect()
            } else {
                (0..ncols).collect()
            };
            for col in column_order {
                let slot = if source.dtype(col) == target.dtype(col) {
                    guard.data().slot(col)?.clone()
                } else {
                    let array = guard
                        .materialize(col)
                        .wrap_err_with(|| invalid_cast(&source, target))?;
                    let coerced = array
                        .coerce(target.dtype(col))
                        .wrap_err_with(|| invalid_cast(&source, target))?;
                    ColumnSlot::Ready(Arc::new(coerced))
                };
                slots[col] = Some(slot);
            }
            let slots: Vec<ColumnSlot> = slots
                .into_iter()
                .map(|s| s.expect("cast left a column unplaced"))
                .collect();
            if target_grouped {
                TableData::Grouped(BlockTable::from_slots(target.clone(), slots, nrows, None))
            } else {
                TableData::Flat(TupleTable::from_slots(target.clone(), slots, nrows))
            }
        };

        let new_payload = TablePayload::new(
            data,
            guard.index().clone(),
            guard.host().cloned(),
            None,
        );
        Ok(Table::from_payload(new_payload))
    }
}

fn invalid_cast(source: &Arc<Schema>, target: &Arc<Schema>) -> TableError {
    TableError::InvalidCast {
        from: source.describe(),
        to: target.describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndex;
    use crate::types::{Array, DataType};

    fn mixed_table() -> Table {
        Table::init(
            vec![
                Arc::new(Array::int64(vec![1, 2, 3])),
                Arc::new(Array::utf8(["a", "b", "c"])),
                Arc::new(Array::int64(vec![4, 5, 6])),
            ],
            RowIndex::range(0, 3, 1).unwrap(),
            vec!["x".into(), "y".into(), "z".into()],
        )
        .unwrap()
    }

    #[test]
    fn flat_to_grouped_preserves_columns() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let grouped = table.cast(&schema, LayoutKind::Grouped).unwrap();
        assert!(grouped.is_grouped().unwrap());
        // Unchanged types pass through by reference, not by copy.
        assert!(Arc::ptr_eq(
            &table.column(0).unwrap(),
            &grouped.column(0).unwrap()
        ));
        assert_eq!(*grouped.column(1).unwrap(), Array::utf8(["a", "b", "c"]));
    }

    #[test]
    fn grouped_to_flat_roundtrip_is_lossless() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let roundtripped = table
            .cast(&schema, LayoutKind::Grouped)
            .unwrap()
            .cast(&schema, LayoutKind::Flat)
            .unwrap();
        assert!(!roundtripped.is_grouped().unwrap());
        for i in 0..3 {
            assert_eq!(
                *table.column(i).unwrap(),
                *roundtripped.column(i).unwrap()
            );
        }
        assert_eq!(table.len(), roundtripped.len());
    }

    #[test]
    fn same_layout_same_types_shares_slots() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let shared = table.cast(&schema, LayoutKind::Flat).unwrap();
        for i in 0..3 {
            assert!(Arc::ptr_eq(
                &table.column(i).unwrap(),
                &shared.column(i).unwrap()
            ));
        }
    }

    #[test]
    fn retyping_cast_coerces_changed_columns_only() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let retyped_schema = schema.with_dtype_replaced(0, DataType::Float64);
        let cast = table.cast(&retyped_schema, LayoutKind::Grouped).unwrap();
        assert_eq!(*cast.column(0).unwrap(), Array::float64(vec![1.0, 2.0, 3.0]));
        assert!(Arc::ptr_eq(
            &table.column(2).unwrap(),
            &cast.column(2).unwrap()
        ));
    }

    #[test]
    fn grouped_to_grouped_with_differing_type_keys() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let grouped = table.cast(&schema, LayoutKind::Grouped).unwrap();
        let retyped_schema = schema.with_dtype_replaced(2, DataType::Float64);
        let recast = grouped.cast(&retyped_schema, LayoutKind::Grouped).unwrap();
        assert_eq!(
            *recast.column(2).unwrap(),
            Array::float64(vec![4.0, 5.0, 6.0])
        );
        assert_eq!(*recast.column(0).unwrap(), Array::int64(vec![1, 2, 3]));
        assert_eq!(recast.schema().unwrap().layout().block_count(), 3);
    }

    #[test]
    fn undefined_coercion_fails_naming_both_schemas() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let bad_schema = schema.with_dtype_replaced(1, DataType::Int64);
        let err = table.cast(&bad_schema, LayoutKind::Grouped).unwrap_err();
        let cast_err = err.downcast_ref::<TableError>();
        assert!(matches!(cast_err, Some(TableError::InvalidCast { .. })));
        let msg = err.to_string();
        assert!(msg.contains("utf8"));
        assert!(msg.contains("int64"));
        // Source table is untouched by the failed cast.
        assert_eq!(*table.column(1).unwrap(), Array::utf8(["a", "b", "c"]));
    }

    #[test]
    fn arity_mismatch_is_an_invalid_cast() {
        let table = mixed_table();
        let other =
            Schema::new(vec!["a".into()], vec![DataType::Int64]).unwrap();
        let err = table.cast(&other, LayoutKind::Flat).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::InvalidCast { .. })
        ));
    }

    #[test]
    fn cast_shares_the_index() {
        let table = mixed_table();
        let schema = table.schema().unwrap();
        let grouped = table.cast(&schema, LayoutKind::Grouped).unwrap();
        assert!(Arc::ptr_eq(
            &table.index().unwrap(),
            &grouped.index().unwrap()
        ));
    }
}
