//! # blocktable - Column-Oriented Block-Structured Table Runtime
//!
//! blocktable stores a heterogeneous set of typed columns behind two
//! interchangeable physical layouts and keeps them in sync with an optional
//! external host object. The design prioritizes:
//!
//! - **O(1) column access**: per-schema precomputed block offsets
//! - **Shared ownership**: columns and indexes move between tables by
//!   reference, never by copy
//! - **Lossless layout casts**: flat and grouped representations of the
//!   same logical table convert in both directions without data loss
//!
//! ## Quick Start
//!
//! ```ignore
//! use blocktable::{Array, RowIndex, Table};
//! use std::sync::Arc;
//!
//! let table = Table::init(
//!     vec![
//!         Arc::new(Array::int64(vec![1, 2, 3])),
//!         Arc::new(Array::utf8(["a", "b", "c"])),
//!     ],
//!     RowIndex::range(0, 3, 1)?,
//!     vec!["x".into(), "y".into()],
//! )?;
//!
//! assert_eq!(table.len(), 3);
//! let grouped = table.cast(&table.schema()?, blocktable::LayoutKind::Grouped)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │          Table (handle)              │
//! ├──────────────────────────────────────┤
//! │   TablePayload (shared, ref-counted) │
//! ├───────────────────┬──────────────────┤
//! │ BlockTable        │ TupleTable       │
//! │ (grouped layout)  │ (flat layout)    │
//! ├───────────────────┴──────────────────┤
//! │  ColumnSlot (Pending/Ready/Missing)  │
//! ├──────────────────────────────────────┤
//! │     Array storage (typed vectors)    │
//! └──────────────────────────────────────┘
//!          │                    │
//!     Schema + BlockLayout   HostObject
//!     (immutable, shared)    (lazy unbox / reflection)
//! ```
//!
//! ## Physical Layouts
//!
//! A table's payload holds exactly one of two representations:
//!
//! - **Flat** (`TupleTable`): one slot per logical column, in declaration
//!   order. The default for tables built from a tuple of arrays.
//! - **Grouped** (`BlockTable`): columns partitioned into homogeneous
//!   blocks keyed by element type, so tables with very many same-typed
//!   columns stay compact and positionally addressable.
//!
//! The cast engine converts between them (and between schemas whose
//! per-column types differ) as an exhaustive match over the four
//! source/target layout cases.
//!
//! ## Host Mirroring
//!
//! A table may be a view over an object owned by an external host runtime.
//! Columns are pulled out of the host lazily on first read, and every write
//! is pushed back synchronously under a scoped host lock, so host-side
//! aliases observe mutations.
//!
//! ## Module Overview
//!
//! - [`types`]: element types, column arrays, validity bitmaps
//! - [`index`]: the row-index capability (range / int64 / utf8)
//! - [`schema`]: immutable schemas and the derived block layout
//! - [`table`]: payloads, handles, operations, casts, constant folding
//! - [`error`]: the typed error taxonomy
//! - [`config`]: sentinel and sizing constants

pub mod config;
pub mod error;
pub mod index;
pub mod schema;
pub mod table;
pub mod types;

pub use error::TableError;
pub use index::RowIndex;
pub use schema::{BlockLayout, Schema};
pub use table::{
    fold_constant, BlockTable, ColumnNames, ColumnSlot, HostObject, HostRef, HostSync,
    LayoutKind, Table, TableData, TablePayload, TupleTable,
};
pub use types::{Array, ArrayRef, Bitmap, DataType, Scalar};
