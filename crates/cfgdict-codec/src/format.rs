//! Value to text serialization.
//!
//! Produces the right-hand side of a `key = value` line. Strings are never
//! quoted, so a string holding a comma or a line break does not read back
//! as the same value.

use crate::value::{NumericArray, Scalar, Value};

/// Separator between list fields on one line.
pub const FIELD_SEPARATOR: &str = ", ";

/// Separator between matrix rows (continuation line).
pub const ROW_SEPARATOR: &str = "\n\t";

/// Format a float so that it always reads back as a float.
///
/// `3.0` stays `3.0` rather than `3`, which would re-parse as an integer.
pub fn format_float(x: f64) -> String {
    format!("{:?}", x)
}

/// Format a typed value as raw field text.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Scalar(s) => s.to_string(),
        Value::List(items) => join_fields(items),
        Value::Matrix(rows) => rows
            .iter()
            .map(|row| join_fields(row))
            .collect::<Vec<_>>()
            .join(ROW_SEPARATOR),
        Value::Array(array) => format_array(array),
    }
}

/// Bracketed, space-separated array text.
pub fn format_array(array: &NumericArray) -> String {
    if array.ndim() == 2 {
        let rows: Vec<String> = array.rows().map(bracket_row).collect();
        format!("[ {} ]", rows.join(" "))
    } else {
        bracket_row(array.as_slice())
    }
}

fn bracket_row(row: &[f64]) -> String {
    if row.is_empty() {
        return "[ ]".to_string();
    }
    let fields: Vec<String> = row.iter().map(|x| format_float(*x)).collect();
    format!("[ {} ]", fields.join(" "))
}

fn join_fields(items: &[Scalar]) -> String {
    items
        .iter()
        .map(Scalar::to_string)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}
