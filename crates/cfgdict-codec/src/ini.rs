//! Section / `key = value` reader.
//!
//! Tokenizes one file into sections of raw entries. Values are kept as raw
//! text (continuation lines joined with `\n`); typing them is the job of
//! [`crate::parse_value`].
//!
//! Grammar:
//! - `[name]` opens a section; entries before the first header belong to
//!   the top-level section (empty name)
//! - `key = value` or `key: value`, split at the first delimiter
//! - a line indented deeper than its key line continues the value
//! - lines starting with `#` or `;` are comments, anywhere
//! - entries of `[DEFAULT]` are inherited by every named section
//! - a section or key repeated within one file is an error

use std::collections::HashSet;
use thiserror::Error;

/// Section whose entries every named section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Line prefixes that mark a comment.
pub const COMMENT_PREFIXES: &[char] = &['#', ';'];

/// Key / value delimiters; the first one on the line wins.
pub const DELIMITERS: &[char] = &['=', ':'];

/// Syntax error with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct SyntaxError {
    pub line: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("section header is missing its closing bracket")]
    UnclosedHeader,

    #[error("empty section header")]
    EmptyHeader,

    #[error("expected `key = value`, got {0:?}")]
    MissingDelimiter(String),

    #[error("entry has an empty key")]
    EmptyKey,

    #[error("section [{0}] appears more than once")]
    DuplicateSection(String),

    #[error("key {key:?} appears more than once in section [{section}]")]
    DuplicateKey { section: String, key: String },
}

/// One `key = value` entry with its raw value text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub key: String,
    pub raw: String,
    /// Line of the key.
    pub line: usize,
}

/// A section and its entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    /// Header text between the brackets; empty for the top-level section.
    pub name: String,
    pub entries: Vec<RawEntry>,
}

impl IniSection {
    pub fn is_top_level(&self) -> bool {
        self.name.is_empty()
    }
}

/// A tokenized file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<IniSection>,
    defaults: Vec<RawEntry>,
}

impl Document {
    /// Sections in file order, the top-level section first when present.
    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Entries of the `[DEFAULT]` section.
    pub fn defaults(&self) -> &[RawEntry] {
        &self.defaults
    }

    /// Effective entries of a section: its own, then inherited defaults it
    /// does not override. The top-level section inherits nothing.
    pub fn options<'a>(&'a self, section: &'a IniSection) -> Vec<&'a RawEntry> {
        let mut entries: Vec<&RawEntry> = section.entries.iter().collect();
        if !section.is_top_level() {
            entries.extend(
                self.defaults
                    .iter()
                    .filter(|d| !section.entries.iter().any(|e| e.key == d.key)),
            );
        }
        entries
    }

    /// Flat `(section, key, raw)` triples in file order.
    pub fn triples(&self) -> Vec<(&str, &str, &str)> {
        self.sections
            .iter()
            .flat_map(|section| {
                self.options(section)
                    .into_iter()
                    .map(move |e| (section.name.as_str(), e.key.as_str(), e.raw.as_str()))
            })
            .collect()
    }

    fn entries_mut(&mut self, target: Target) -> &mut Vec<RawEntry> {
        match target {
            Target::Defaults => &mut self.defaults,
            Target::Section(index) => &mut self.sections[index].entries,
        }
    }

    fn target_name(&self, target: Target) -> &str {
        match target {
            Target::Defaults => DEFAULT_SECTION,
            Target::Section(index) => &self.sections[index].name,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Defaults,
    Section(usize),
}

/// Tokenize a whole file.
pub fn parse_document(text: &str) -> Result<Document, SyntaxError> {
    let mut doc = Document::default();
    let mut target: Option<Target> = None;
    // Entry still accepting continuation lines, with its key's indentation
    let mut open: Option<(usize, usize)> = None;
    let mut seen_sections: HashSet<String> = HashSet::new();
    let mut seen_keys: HashSet<(String, String)> = HashSet::new();

    for (index, line) in text.lines().enumerate() {
        let lineno = index + 1;
        let content = line.trim();

        if content.starts_with(COMMENT_PREFIXES) {
            continue;
        }

        if content.is_empty() {
            // Kept inside the value if more continuation lines follow
            if let (Some(t), Some((entry, _))) = (target, open) {
                doc.entries_mut(t)[entry].raw.push('\n');
            }
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        if let (Some(t), Some((entry, key_indent))) = (target, open) {
            if indent > key_indent {
                let raw = &mut doc.entries_mut(t)[entry].raw;
                raw.push('\n');
                raw.push_str(content);
                continue;
            }
        }

        if content.starts_with('[') {
            let name = parse_header(content).map_err(|kind| SyntaxError { line: lineno, kind })?;
            open = None;
            if name == DEFAULT_SECTION {
                target = Some(Target::Defaults);
                continue;
            }
            if !seen_sections.insert(name.clone()) {
                return Err(SyntaxError {
                    line: lineno,
                    kind: SyntaxErrorKind::DuplicateSection(name),
                });
            }
            doc.sections.push(IniSection {
                name,
                entries: Vec::new(),
            });
            target = Some(Target::Section(doc.sections.len() - 1));
            continue;
        }

        let (key, raw) = split_entry(content).map_err(|kind| SyntaxError { line: lineno, kind })?;

        let t = match target {
            Some(t) => t,
            None => {
                doc.sections.push(IniSection {
                    name: String::new(),
                    entries: Vec::new(),
                });
                let t = Target::Section(doc.sections.len() - 1);
                target = Some(t);
                t
            }
        };

        let section = doc.target_name(t).to_string();
        if !seen_keys.insert((section.clone(), key.clone())) {
            return Err(SyntaxError {
                line: lineno,
                kind: SyntaxErrorKind::DuplicateKey { section, key },
            });
        }

        let entries = doc.entries_mut(t);
        entries.push(RawEntry {
            key,
            raw,
            line: lineno,
        });
        open = Some((entries.len() - 1, indent));
    }

    // Blank lines only survive between continuation lines
    for entry in doc
        .defaults
        .iter_mut()
        .chain(doc.sections.iter_mut().flat_map(|s| s.entries.iter_mut()))
    {
        let trimmed_len = entry.raw.trim_end().len();
        entry.raw.truncate(trimmed_len);
    }

    Ok(doc)
}

fn parse_header(content: &str) -> Result<String, SyntaxErrorKind> {
    let close = content.rfind(']').ok_or(SyntaxErrorKind::UnclosedHeader)?;
    let name = content[1..close].trim();
    if name.is_empty() {
        return Err(SyntaxErrorKind::EmptyHeader);
    }
    Ok(name.to_string())
}

fn split_entry(content: &str) -> Result<(String, String), SyntaxErrorKind> {
    let at = content
        .find(DELIMITERS)
        .ok_or_else(|| SyntaxErrorKind::MissingDelimiter(content.to_string()))?;
    let key = content[..at].trim();
    if key.is_empty() {
        return Err(SyntaxErrorKind::EmptyKey);
    }
    let raw = content[at + 1..].trim();
    Ok((key.to_string(), raw.to_string()))
}
