//! Tree to text serialization
//!
//! Each section is written as its values, then its list values, then its
//! subsections. A subsection gets a blank line and a `[parent.child]`
//! header whose segments escape literal dots as `_|_`.

use cfgdict_codec::{child_section_name, format_value, Value};
use tracing::warn;

use super::node::{ConfigNode, Entry};

/// Render a tree in the file format.
///
/// With `sections`, only top-level subsections whose key is listed are
/// written; top-level values are always written. A top-level section with an
/// empty key has no header that reads back, so it is skipped with a warning.
pub fn to_text(node: &ConfigNode, sections: Option<&[&str]>) -> String {
    let mut out = String::new();
    write_section(&mut out, node, None, sections);
    out
}

fn write_section(
    out: &mut String,
    node: &ConfigNode,
    header: Option<&str>,
    sections: Option<&[&str]>,
) {
    let mut values: Vec<(&str, &Value)> = Vec::new();
    let mut lists: Vec<(&str, &Value)> = Vec::new();
    let mut children: Vec<(&str, &ConfigNode)> = Vec::new();

    for (key, entry) in node {
        match entry {
            Entry::Section(child) => children.push((key.as_str(), child)),
            Entry::Value(value) if value.is_list_like() => lists.push((key.as_str(), value)),
            Entry::Value(value) => values.push((key.as_str(), value)),
        }
    }

    for (key, value) in values.into_iter().chain(lists) {
        out.push_str(&format!("{} = {}\n", key, format_value(value)));
    }

    for (key, child) in children {
        if let Some(allowed) = sections {
            if !allowed.contains(&key) {
                continue;
            }
        }
        let name = child_section_name(header, key);
        if name.is_empty() {
            warn!(entries = child.len(), "skipping section with an empty name");
            continue;
        }
        out.push_str(&format!("\n[{}]\n", name));
        write_section(out, child, Some(&name), None);
    }
}
