//! # Constant Folding
//!
//! Builds a [`TablePayload`] directly from literal data whose full contents
//! are known at definition time, bypassing the general construction path.
//! The folded payload is observably identical to one built live from the
//! same source values: same column order, same values, same index, and —
//! for the grouped layout — the same block layout, built one block per type
//! key in a single pass.
//!
//! A folded constant never has a host back-reference: there is no live host
//! object behind a literal.

use std::sync::Arc;

use eyre::Result;

use crate::error::TableError;
use crate::index::RowIndex;
use crate::schema::Schema;
use crate::table::block::BlockTable;
use crate::table::cast::LayoutKind;
use crate::table::payload::{TableData, TablePayload};
use crate::table::tuple::TupleTable;
use crate::types::{Array, ArrayRef, DataType};

/// Folds a fully known table literal into a payload.
///
/// Emits one literal column per schema position; for the grouped layout the
/// blocks are allocated up front per type key, matching the live
/// constructor's layout exactly. The row index is folded alongside.
pub fn fold_constant(
    columns: Vec<Array>,
    index: RowIndex,
    names: Vec<String>,
    layout: LayoutKind,
) -> Result<TablePayload> {
    if names.len() != columns.len() {
        return Err(TableError::SchemaMismatch {
            columns: columns.len(),
            names: names.len(),
        }
        .into());
    }
    let dtypes: Vec<DataType> = columns.iter().map(|c| c.data_type()).collect();
    let schema = Schema::new(names, dtypes)?;
    let arrays: Vec<ArrayRef> = columns.into_iter().map(Arc::new).collect();
    let data = match layout {
        LayoutKind::Grouped => TableData::Grouped(BlockTable::from_arrays(schema, arrays)?),
        LayoutKind::Flat => TableData::Flat(TupleTable::from_arrays(schema, arrays)?),
    };
    Ok(TablePayload::new(data, Arc::new(index), None, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::payload::Table;

    fn literal_columns() -> Vec<Array> {
        vec![
            Array::int64(vec![1, 2, 3]),
            Array::utf8(["a", "b", "c"]),
            Array::int64(vec![7, 8, 9]),
        ]
    }

    fn names() -> Vec<String> {
        vec!["x".into(), "y".into(), "z".into()]
    }

    #[test]
    fn folded_constant_has_no_host() {
        let payload = fold_constant(
            literal_columns(),
            RowIndex::range(0, 3, 1).unwrap(),
            names(),
            LayoutKind::Flat,
        )
        .unwrap();
        assert!(payload.host().is_none());
        let table = Table::from_payload(payload);
        assert!(!table.has_host());
    }

    #[test]
    fn folded_flat_matches_live_construction() {
        let folded = Table::from_payload(
            fold_constant(
                literal_columns(),
                RowIndex::range(0, 3, 1).unwrap(),
                names(),
                LayoutKind::Flat,
            )
            .unwrap(),
        );
        let live = Table::init(
            literal_columns().into_iter().map(Arc::new).collect(),
            RowIndex::range(0, 3, 1).unwrap(),
            names(),
        )
        .unwrap();
        assert_eq!(folded.len(), live.len());
        for i in 0..3 {
            assert_eq!(*folded.column(i).unwrap(), *live.column(i).unwrap());
        }
        assert_eq!(*folded.index().unwrap(), *live.index().unwrap());
    }

    #[test]
    fn folded_grouped_matches_cast_of_live_table() {
        let folded = Table::from_payload(
            fold_constant(
                literal_columns(),
                RowIndex::range(0, 3, 1).unwrap(),
                names(),
                LayoutKind::Grouped,
            )
            .unwrap(),
        );
        assert!(folded.is_grouped().unwrap());
        let live = Table::init(
            literal_columns().into_iter().map(Arc::new).collect(),
            RowIndex::range(0, 3, 1).unwrap(),
            names(),
        )
        .unwrap();
        let live_grouped = live
            .cast(&live.schema().unwrap(), LayoutKind::Grouped)
            .unwrap();
        assert_eq!(
            folded.schema().unwrap().layout(),
            live_grouped.schema().unwrap().layout()
        );
        for i in 0..3 {
            assert_eq!(*folded.column(i).unwrap(), *live_grouped.column(i).unwrap());
        }
    }

    #[test]
    fn fold_rejects_name_mismatch() {
        let err = fold_constant(
            literal_columns(),
            RowIndex::range(0, 3, 1).unwrap(),
            vec!["only".into()],
            LayoutKind::Flat,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::SchemaMismatch { .. })
        ));
    }
}
