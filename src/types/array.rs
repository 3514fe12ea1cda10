//! # Column Arrays
//!
//! This module provides `Array`, the typed column storage for the table
//! core, and `Scalar<'a>`, the zero-copy element view returned by reads.
//!
//! ## Design Goals
//!
//! 1. **One variant per physical type**: the enum discriminant is the
//!    column's [`DataType`], so block grouping never inspects values
//! 2. **Shared ownership**: columns move between tables as [`ArrayRef`]
//!    (`Arc<Array>`); cloning the ref is the ownership increment, dropping
//!    it the decrement
//! 3. **Zero-copy reads**: `get` borrows text from the underlying buffer
//!
//! ## Null Encoding
//!
//! | Variant | Encoding |
//! |---------|----------|
//! | Int64 | cannot be null |
//! | Float64 | NaN |
//! | NullableInt64 | validity bitmap |
//! | Boolean | validity bitmap |
//! | Utf8 | validity bitmap |
//! | Categorical | negative code |
//! | Datetime64 | [`NAT`] sentinel |
//!
//! ## Coercion
//!
//! `coerce` converts a column to a different element type, allocating a new
//! array; identity coercion hands back a clone. The set of defined pairs is
//! mirrored by [`DataType::can_coerce_to`], which the cast engine consults
//! before any allocation happens.

use std::borrow::Cow;
use std::sync::Arc;

use eyre::{bail, ensure, Result};

use crate::config::{CATEGORICAL_NULL_CODE, NAT};
use crate::types::bitmap::Bitmap;
use crate::types::DataType;

/// Shared-ownership handle to a column array.
pub type ArrayRef = Arc<Array>;

/// A single element read from an array or a row index.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Cow<'a, str>),
    Code(i32),
    Datetime(i64),
}

/// Typed column storage. One variant per physical element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    NullableInt64 { values: Vec<i64>, validity: Bitmap },
    Boolean { values: Bitmap, validity: Bitmap },
    Utf8 { values: Vec<String>, validity: Bitmap },
    Categorical { codes: Vec<i32> },
    Datetime64(Vec<i64>),
}

impl Array {
    /// Creates an int64 array.
    pub fn int64(values: impl Into<Vec<i64>>) -> Self {
        Array::Int64(values.into())
    }

    /// Creates a float64 array. NaN elements read as null.
    pub fn float64(values: impl Into<Vec<f64>>) -> Self {
        Array::Float64(values.into())
    }

    /// Creates a nullable int64 array from optional values.
    pub fn nullable_int64(values: impl IntoIterator<Item = Option<i64>>) -> Self {
        let mut raw = Vec::new();
        let mut validity = Bitmap::new();
        for value in values {
            raw.push(value.unwrap_or(0));
            validity.push(value.is_some());
        }
        Array::NullableInt64 {
            values: raw,
            validity,
        }
    }

    /// Creates a boolean array from optional values.
    pub fn boolean(values: impl IntoIterator<Item = Option<bool>>) -> Self {
        let mut raw = Bitmap::new();
        let mut validity = Bitmap::new();
        for value in values {
            raw.push(value.unwrap_or(false));
            validity.push(value.is_some());
        }
        Array::Boolean {
            values: raw,
            validity,
        }
    }

    /// Creates a utf8 array from string-like values, all valid.
    pub fn utf8<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let validity = Bitmap::with_len(values.len(), true);
        Array::Utf8 { values, validity }
    }

    /// Creates a utf8 array from optional string-like values.
    pub fn utf8_opt<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut raw = Vec::new();
        let mut validity = Bitmap::new();
        for value in values {
            match value {
                Some(s) => {
                    raw.push(s.into());
                    validity.push(true);
                }
                None => {
                    raw.push(String::new());
                    validity.push(false);
                }
            }
        }
        Array::Utf8 {
            values: raw,
            validity,
        }
    }

    /// Creates a categorical-code array. Negative codes read as null.
    pub fn categorical(codes: impl Into<Vec<i32>>) -> Self {
        Array::Categorical {
            codes: codes.into(),
        }
    }

    /// Creates a datetime64 array of nanosecond timestamps. [`NAT`] reads
    /// as null.
    pub fn datetime64(values: impl Into<Vec<i64>>) -> Self {
        Array::Datetime64(values.into())
    }

    /// Returns the physical element type.
    pub fn data_type(&self) -> DataType {
        match self {
            Array::Int64(_) => DataType::Int64,
            Array::Float64(_) => DataType::Float64,
            Array::NullableInt64 { .. } => DataType::NullableInt64,
            Array::Boolean { .. } => DataType::Boolean,
            Array::Utf8 { .. } => DataType::Utf8,
            Array::Categorical { .. } => DataType::Categorical,
            Array::Datetime64(_) => DataType::Datetime64,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Array::Int64(values) => values.len(),
            Array::Float64(values) => values.len(),
            Array::NullableInt64 { values, .. } => values.len(),
            Array::Boolean { values, .. } => values.len(),
            Array::Utf8 { values, .. } => values.len(),
            Array::Categorical { codes } => codes.len(),
            Array::Datetime64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if row `i` is missing.
    pub fn is_null(&self, i: usize) -> bool {
        match self {
            Array::Int64(_) => false,
            Array::Float64(values) => values[i].is_nan(),
            Array::NullableInt64 { validity, .. } => !validity.get(i),
            Array::Boolean { validity, .. } => !validity.get(i),
            Array::Utf8 { validity, .. } => !validity.get(i),
            Array::Categorical { codes } => codes[i] < 0,
            Array::Datetime64(values) => values[i] == NAT,
        }
    }

    /// Reads row `i` as a scalar. Text is borrowed, not copied.
    pub fn get(&self, i: usize) -> Scalar<'_> {
        if self.is_null(i) {
            return Scalar::Null;
        }
        match self {
            Array::Int64(values) => Scalar::Int(values[i]),
            Array::Float64(values) => Scalar::Float(values[i]),
            Array::NullableInt64 { values, .. } => Scalar::Int(values[i]),
            Array::Boolean { values, .. } => Scalar::Bool(values.get(i)),
            Array::Utf8 { values, .. } => Scalar::Str(Cow::Borrowed(&values[i])),
            Array::Categorical { codes } => Scalar::Code(codes[i]),
            Array::Datetime64(values) => Scalar::Datetime(values[i]),
        }
    }

    /// Allocates an array of `len` rows with this array's element type,
    /// filled with nulls where the type supports them and zeros otherwise.
    pub fn alloc_like(&self, len: usize) -> Array {
        Array::alloc(self.data_type(), len)
    }

    /// Allocates an array of `len` rows of the given type, filled with
    /// nulls where the type supports them and zeros otherwise.
    pub fn alloc(dtype: DataType, len: usize) -> Array {
        match dtype {
            DataType::Int64 => Array::Int64(vec![0; len]),
            DataType::Float64 => Array::Float64(vec![f64::NAN; len]),
            DataType::NullableInt64 => Array::NullableInt64 {
                values: vec![0; len],
                validity: Bitmap::with_len(len, false),
            },
            DataType::Boolean => Array::Boolean {
                values: Bitmap::with_len(len, false),
                validity: Bitmap::with_len(len, false),
            },
            DataType::Utf8 => Array::Utf8 {
                values: vec![String::new(); len],
                validity: Bitmap::with_len(len, false),
            },
            DataType::Categorical => Array::Categorical {
                codes: vec![CATEGORICAL_NULL_CODE; len],
            },
            DataType::Datetime64 => Array::Datetime64(vec![NAT; len]),
        }
    }

    /// Coerces this array to `target`, allocating a new array for real
    /// conversions and cloning for identity.
    ///
    /// The defined pairs are exactly those [`DataType::can_coerce_to`]
    /// admits; any other pair fails with a message naming both types.
    pub fn coerce(&self, target: DataType) -> Result<Array> {
        if self.data_type() == target {
            return Ok(self.clone());
        }
        match (self, target) {
            (Array::Int64(values), DataType::Float64) => {
                Ok(Array::Float64(values.iter().map(|&v| v as f64).collect()))
            }
            (Array::Int64(values), DataType::NullableInt64) => Ok(Array::NullableInt64 {
                values: values.clone(),
                validity: Bitmap::with_len(values.len(), true),
            }),
            (Array::Int64(values), DataType::Datetime64) => Ok(Array::Datetime64(values.clone())),
            (Array::NullableInt64 { values, validity }, DataType::Float64) => Ok(Array::Float64(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| if validity.get(i) { v as f64 } else { f64::NAN })
                    .collect(),
            )),
            (Array::NullableInt64 { values, validity }, DataType::Int64) => {
                ensure!(
                    validity.count_set() == values.len(),
                    "cannot coerce nullable_int64 to int64: column contains nulls"
                );
                Ok(Array::Int64(values.clone()))
            }
            (Array::Datetime64(values), DataType::Int64) => Ok(Array::Int64(values.clone())),
            (Array::Categorical { codes }, DataType::Int64) => {
                Ok(Array::Int64(codes.iter().map(|&c| c as i64).collect()))
            }
            (_, _) => bail!(
                "no coercion from {} to {}",
                self.data_type().name(),
                target.name()
            ),
        }
    }
}
