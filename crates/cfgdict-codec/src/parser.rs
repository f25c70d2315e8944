//! Raw text to typed value inference.
//!
//! Every raw field parses to something. Rules are tried from the most
//! specific to the least specific, and a failed rule falls through to the
//! next one:
//!
//! 1. numeric array (`[ 1.0 2.0 ]`, `[ [ 1 2 ] [ 3 4 ] ]`), comma-free text only
//! 2. one line: scalar or comma-separated list
//! 3. several lines: one scalar or list per line
//! 4. scalar: integer, then float, then the trimmed string

use regex_lite::Regex;
use std::sync::OnceLock;

use crate::value::{NumericArray, Scalar, Value};

/// Matches the boundary between two rows of a 2-D array (`] [`).
fn row_boundary() -> &'static Regex {
    static ROW_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    ROW_BOUNDARY.get_or_init(|| Regex::new(r"\]\s*\[").expect("row boundary pattern is valid"))
}

/// Parse the raw text of one key's value.
///
/// The text may span several lines when the value was continued on
/// indented lines. An empty value parses to an empty list.
pub fn parse_value(raw: &str) -> Value {
    if let Some(array) = parse_numeric_array(raw) {
        return array_value(array);
    }

    let lines: Vec<&str> = raw.lines().collect();
    match lines.as_slice() {
        [] => Value::List(Vec::new()),
        [line] => parse_line(line),
        _ => parse_lines(&lines),
    }
}

#[cfg(feature = "numeric-array")]
fn array_value(array: NumericArray) -> Value {
    Value::Array(array)
}

#[cfg(not(feature = "numeric-array"))]
fn array_value(array: NumericArray) -> Value {
    array.into_nested()
}

/// Try to read bracketed, whitespace-separated floats.
///
/// Returns `None` when the text contains a comma, is not bracketed, or any
/// field fails to parse. A 2-D array is reshaped to its row count and needs
/// the element total to divide evenly by it.
pub fn parse_numeric_array(raw: &str) -> Option<NumericArray> {
    if raw.contains(',') {
        return None;
    }
    let interior = raw.trim().strip_prefix('[')?.strip_suffix(']')?;

    if let Some(values) = parse_floats(interior) {
        return Some(NumericArray::from_vec(values));
    }

    let inner = interior.trim().strip_prefix('[')?.strip_suffix(']')?;
    let rows = row_boundary()
        .split(inner)
        .map(parse_floats)
        .collect::<Option<Vec<_>>>()?;
    NumericArray::from_rows(rows)
}

fn parse_floats(text: &str) -> Option<Vec<f64>> {
    text.split_whitespace()
        .map(|field| field.parse::<f64>().ok())
        .collect()
}

/// Parse a value spread over several lines.
///
/// Without any comma the result is a list with one scalar per line.
/// Otherwise it is a matrix, and comma-free lines become single-field rows.
fn parse_lines(lines: &[&str]) -> Value {
    if !lines.iter().any(|line| line.contains(',')) {
        return Value::List(lines.iter().map(|line| parse_scalar(line)).collect());
    }

    let rows = lines
        .iter()
        .map(|line| line_fields(line).unwrap_or_else(|| vec![parse_scalar(line)]))
        .collect();
    Value::Matrix(rows)
}

/// Parse one physical line: a comma-separated list or a single scalar.
pub fn parse_line(line: &str) -> Value {
    match line_fields(line) {
        Some(fields) => Value::List(fields),
        None => Value::Scalar(parse_scalar(line)),
    }
}

fn line_fields(line: &str) -> Option<Vec<Scalar>> {
    line.contains(',')
        .then(|| line.split(',').map(parse_scalar).collect())
}

/// Parse one field: integer, then float, then the trimmed text itself.
pub fn parse_scalar(field: &str) -> Scalar {
    let field = field.trim();
    if let Ok(i) = field.parse::<i64>() {
        return Scalar::Int(i);
    }
    if let Ok(x) = field.parse::<f64>() {
        return Scalar::Float(x);
    }
    Scalar::Str(field.to_string())
}
