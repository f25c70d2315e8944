//! Typed values inferred from raw text fields.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

use crate::format::format_float;

/// A single scalar field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => f.write_str(&format_float(*x)),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// Homogeneous float array of one or two dimensions.
///
/// Written in source text as `[ 1.0 2.0 ]` or `[ [ 1.0 2.0 ] [ 3.0 4.0 ] ]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    values: Vec<f64>,
    shape: Vec<usize>,
}

impl NumericArray {
    /// Flat array with shape `[len]`.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let shape = vec![values.len()];
        Self { values, shape }
    }

    /// Two-dimensional array from rows of text.
    ///
    /// Rows are joined and reshaped to `rows.len()` rows, so rows of unequal
    /// length are fine as long as the total divides evenly: `[1 2 3] [4] [5 6]`
    /// becomes 3 x 2. Returns `None` when it does not, or when there are no
    /// elements at all.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let nrows = rows.len();
        let values: Vec<f64> = rows.into_iter().flatten().collect();
        if values.is_empty() || values.len() % nrows != 0 {
            return None;
        }
        let shape = vec![nrows, values.len() / nrows];
        Some(Self { values, shape })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major element storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Rows of a 2-D array; a flat array yields itself as a single row.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        let cols = match self.shape.as_slice() {
            [_, cols] => *cols,
            _ => self.values.len(),
        };
        // chunks() panics on zero
        self.values.chunks(cols.max(1))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.shape.as_slice() {
            [rows, cols] if row < *rows && col < *cols => Some(self.values[row * cols + col]),
            [len] if row == 0 && col < *len => Some(self.values[col]),
            _ => None,
        }
    }

    /// Equivalent value without the array variant: a float list for 1-D,
    /// a float matrix for 2-D.
    pub fn into_nested(self) -> Value {
        if self.ndim() == 2 {
            Value::Matrix(
                self.rows()
                    .map(|row| row.iter().copied().map(Scalar::Float).collect())
                    .collect(),
            )
        } else {
            Value::List(self.values.into_iter().map(Scalar::Float).collect())
        }
    }
}

/// A parsed key value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Comma-separated fields on one line, or one scalar per line.
    List(Vec<Scalar>),
    /// Multi-line value where at least one line is comma-separated.
    ///
    /// A comma-free line becomes a one-element row, so `x` over `1, 2` is
    /// `[["x"], [1, 2]]`, not `["x", [1, 2]]`. The text form is the same.
    Matrix(Vec<Vec<Scalar>>),
    Array(NumericArray),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[Vec<Scalar>]> {
        match self {
            Value::Matrix(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&NumericArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Whether the writer places this value in the list group.
    pub fn is_list_like(&self) -> bool {
        matches!(self, Value::List(_) | Value::Matrix(_))
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(Scalar::Float(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(items: Vec<Scalar>) -> Self {
        Value::List(items)
    }
}

impl From<NumericArray> for Value {
    fn from(a: NumericArray) -> Self {
        Value::Array(a)
    }
}

impl Serialize for NumericArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.ndim() == 2 {
            let mut seq = serializer.serialize_seq(Some(self.shape[0]))?;
            for row in self.rows() {
                seq.serialize_element(row)?;
            }
            seq.end()
        } else {
            self.values.serialize(serializer)
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::List(items) => items.serialize(serializer),
            Value::Matrix(rows) => rows.serialize(serializer),
            Value::Array(a) => a.serialize(serializer),
        }
    }
}
