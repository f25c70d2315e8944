//! Section header naming.
//!
//! A header such as `[detector.calib_|_v2]` names the path
//! `["detector", "calib.v2"]`: every `.` separates nested sections and the
//! sentinel `_|_` stands for a literal dot inside one segment. A key that
//! itself contains `_|_` reads back with a dot in its place.

/// Separator between nested section names in a header.
pub const PATH_SEPARATOR: char = '.';

/// Stand-in for a literal dot inside one header segment.
pub const DOT_SENTINEL: &str = "_|_";

/// Split a header into its decoded path segments.
pub fn split_section_name(header: &str) -> Vec<String> {
    header
        .split(PATH_SEPARATOR)
        .map(|segment| segment.replace(DOT_SENTINEL, "."))
        .collect()
}

/// Encode one key for use as a header segment.
pub fn escape_segment(key: &str) -> String {
    key.replace(PATH_SEPARATOR, DOT_SENTINEL)
}

/// Header for `key` nested under an already encoded `parent` header.
pub fn child_section_name(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, escape_segment(key)),
        None => escape_segment(key),
    }
}

/// Header naming a full path of decoded segments.
pub fn join_section_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| escape_segment(segment.as_ref()))
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}
