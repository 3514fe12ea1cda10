//! # Type System
//!
//! Physical element types and column array storage for the table core.
//!
//! - [`DataType`]: canonical element-type enum; equality is the block
//!   grouping relation
//! - [`Array`] / [`ArrayRef`]: typed column storage with shared ownership
//! - [`Scalar`]: zero-copy element view
//! - [`Bitmap`]: byte-packed validity bitmap for the nullable variants

mod array;
mod bitmap;
mod data_type;

pub use array::{Array, ArrayRef, Scalar};
pub use bitmap::Bitmap;
pub use data_type::DataType;
