//! Configuration merge logic
//!
//! Overlays one tree on another with:
//! - Sections: deep-merge by key
//! - Lists and matrices: REPLACE (last wins)
//! - Scalars and arrays: override (last wins)

use super::node::{ConfigNode, Entry};

/// Deep merge two trees.
///
/// Merge semantics:
/// - Sections: deep-merge by key (recursive)
/// - Values: overlay replaces the base entry entirely, including when one
///   side is a section and the other a value
pub fn deep_merge(base: ConfigNode, overlay: ConfigNode) -> ConfigNode {
    let mut merged = base;
    for (key, overlay_entry) in overlay {
        let entry = match merged.remove(&key) {
            Some(base_entry) => merge_entry(base_entry, overlay_entry),
            None => overlay_entry,
        };
        merged.insert(key, entry);
    }
    merged
}

fn merge_entry(base: Entry, overlay: Entry) -> Entry {
    match (base, overlay) {
        // Both sections: deep merge
        (Entry::Section(base_node), Entry::Section(overlay_node)) => {
            Entry::Section(deep_merge(base_node, overlay_node))
        }

        // Anything else: overlay wins, lists are never concatenated
        (_, overlay) => overlay,
    }
}
