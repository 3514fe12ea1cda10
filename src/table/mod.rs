//! # Table Core
//!
//! The table runtime: a heterogeneous set of typed column arrays behind one
//! of two interchangeable physical layouts, with shared-ownership payloads,
//! lazy materialization from a host object, and layout/type casts.
//!
//! ## Modules
//!
//! - [`slot`]: tri-state per-column storage owner
//! - [`host`]: host object protocol and the scoped host lock
//! - [`block`]: grouped layout — per-type column blocks
//! - [`tuple`]: flat layout — one slot per logical column
//! - [`payload`]: shared payload record and the `Table` handle
//! - [`ops`]: construction and column operations
//! - [`cast`]: layout and type conversion between the two layouts
//! - [`constant`]: payload folding for fully known literals

pub mod block;
pub mod cast;
pub mod constant;
pub mod host;
pub mod ops;
pub mod payload;
pub mod slot;
pub mod tuple;

pub use block::{BlockTable, ColumnBlock};
pub use cast::LayoutKind;
pub use constant::fold_constant;
pub use host::{HostObject, HostRef, HostSync};
pub use ops::ColumnNames;
pub use payload::{Table, TableData, TablePayload};
pub use slot::ColumnSlot;
pub use tuple::TupleTable;
