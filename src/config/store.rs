//! Configuration store
//!
//! `ConfigDict` owns a [`ConfigNode`] plus the defaults it was built with
//! and the provenance of every file merged into it. It dereferences to the
//! tree, so reads and in-memory edits go through the `ConfigNode` API.

use cfgdict_codec::{parse_document, parse_value, split_section_name, Document, SyntaxError};
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use tracing::debug;

use super::error::ConfigError;
use super::merge::deep_merge;
use super::node::ConfigNode;
use super::provenance::FileRecord;
use super::writer;

/// Hierarchical typed configuration loaded from section files
#[derive(Debug, Clone, Default)]
pub struct ConfigDict {
    data: ConfigNode,
    default: ConfigNode,
    files: Vec<FileRecord>,
}

impl ConfigDict {
    /// Store seeded with `default`, which `reset` restores.
    pub fn new(default: ConfigNode) -> Self {
        Self {
            data: default.clone(),
            default,
            files: Vec::new(),
        }
    }

    /// Store seeded with `default`, then shallow-updated with `init`.
    pub fn with_init(default: ConfigNode, init: ConfigNode) -> Self {
        let mut dict = Self::new(default);
        dict.data.update(init);
        dict
    }

    /// Build a store and read `paths` into it.
    pub fn from_files<P: AsRef<Path>>(
        default: ConfigNode,
        init: Option<ConfigNode>,
        paths: &[P],
    ) -> Result<Self, ConfigError> {
        let mut dict = match init {
            Some(init) => Self::with_init(default, init),
            None => Self::new(default),
        };
        dict.read(paths, None)?;
        Ok(dict)
    }

    /// Current contents
    pub fn data(&self) -> &ConfigNode {
        &self.data
    }

    /// Seed contents restored by `reset`
    pub fn defaults(&self) -> &ConfigNode {
        &self.default
    }

    pub fn into_inner(self) -> ConfigNode {
        self.data
    }

    /// Read files and merge them into the store.
    ///
    /// Every file is loaded and tokenized before anything is merged, so a
    /// failing file leaves contents and provenance untouched. Files are then
    /// merged in order: sections deep-merge, any other colliding key is
    /// overwritten by the later file.
    ///
    /// With `sections`, only sections whose full header text is listed are
    /// imported, and top-level entries are skipped. Provenance records every
    /// path either way.
    pub fn read<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        sections: Option<&[&str]>,
    ) -> Result<(), ConfigError> {
        let loaded = paths
            .iter()
            .map(|path| load_file(path.as_ref(), sections))
            .collect::<Result<Vec<_>, _>>()?;

        for (document, record) in loaded {
            let overlay = document_to_node(&document, sections);
            debug!(
                path = %record.path.display(),
                sections = document.sections().len(),
                "merging configuration file"
            );
            self.merge(overlay);
            self.files.push(record);
        }
        Ok(())
    }

    /// Write the contents to `path` in the file format.
    ///
    /// With `sections`, only the listed top-level sections are written;
    /// top-level values are always written.
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        sections: Option<&[&str]>,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_text(sections)).map_err(|source| ConfigError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "wrote configuration file");
        Ok(())
    }

    /// Contents in the file format, same rules as `write`.
    pub fn to_text(&self, sections: Option<&[&str]>) -> String {
        writer::to_text(&self.data, sections)
    }

    /// Overlay another tree using the read merge rules.
    pub fn merge(&mut self, overlay: ConfigNode) {
        let base = std::mem::take(&mut self.data);
        self.data = deep_merge(base, overlay);
    }

    /// Restore the seed contents. Provenance is kept.
    pub fn reset(&mut self) {
        self.data = self.default.clone();
    }

    /// Drop all contents and provenance.
    pub fn clear(&mut self) {
        self.data.clear();
        self.files.clear();
    }

    /// Files read since construction or the last `clear`, oldest first.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn last_file(&self) -> Result<&FileRecord, ConfigError> {
        self.files.last().ok_or(ConfigError::EmptyProvenance)
    }
}

impl Deref for ConfigDict {
    type Target = ConfigNode;

    fn deref(&self) -> &ConfigNode {
        &self.data
    }
}

impl DerefMut for ConfigDict {
    fn deref_mut(&mut self) -> &mut ConfigNode {
        &mut self.data
    }
}

/// Parse file-format text into a tree, without touching any store.
pub fn parse_text(text: &str, sections: Option<&[&str]>) -> Result<ConfigNode, SyntaxError> {
    let document = parse_document(text)?;
    Ok(document_to_node(&document, sections))
}

fn load_file(path: &Path, sections: Option<&[&str]>) -> Result<(Document, FileRecord), ConfigError> {
    let bytes = fs::read(path).map_err(|source| ConfigError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let record = FileRecord::new(path, sections, &bytes);

    let text = String::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((document, record))
}

fn document_to_node(document: &Document, sections: Option<&[&str]>) -> ConfigNode {
    let mut root = ConfigNode::new();
    for section in document.sections() {
        let selected = match sections {
            None => true,
            Some(allowed) => !section.is_top_level() && allowed.contains(&section.name.as_str()),
        };
        if !selected {
            continue;
        }

        let node = if section.is_top_level() {
            &mut root
        } else {
            let path = split_section_name(&section.name);
            root.walk_mut(path.as_slice())
        };
        for entry in document.options(section) {
            node.insert(entry.key.clone(), parse_value(&entry.raw));
        }
    }
    root
}
