//! Value codec for cfgdict files.
//!
//! Infers a typed [`Value`] from the raw text of a `key = value` entry and
//! formats it back, splits and joins dotted section headers, and tokenizes
//! whole files into sections of raw entries. No I/O happens here.

pub mod format;
pub mod ini;
pub mod parser;
pub mod section;
pub mod value;

pub use format::{format_array, format_float, format_value};
pub use ini::{parse_document, Document, IniSection, RawEntry, SyntaxError, SyntaxErrorKind};
pub use parser::{parse_line, parse_numeric_array, parse_scalar, parse_value};
pub use section::{child_section_name, escape_segment, join_section_name, split_section_name};
pub use value::{NumericArray, Scalar, Value};
