//! Provenance of store contents
//!
//! Every `read` appends one record per file, in argument order, with the
//! section filter it was read with and a digest of the bytes read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A file merged into the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    /// Path as given to `read`
    pub path: PathBuf,

    /// Section filter in effect (None = every section)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,

    /// SHA-256 digest of raw file bytes
    pub digest: String,

    /// When the file was read
    pub loaded_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(path: &Path, sections: Option<&[&str]>, bytes: &[u8]) -> Self {
        Self {
            path: path.to_path_buf(),
            sections: sections.map(|s| s.iter().map(|name| name.to_string()).collect()),
            digest: sha256_hex(bytes),
            loaded_at: Utc::now(),
        }
    }

    /// One-line description for listings
    pub fn to_human(&self) -> String {
        let filter = match &self.sections {
            Some(sections) => format!(" [{}]", sections.join(", ")),
            None => String::new(),
        };
        format!(
            "{}{} sha256:{} at {}",
            self.path.display(),
            filter,
            &self.digest[..12.min(self.digest.len())],
            self.loaded_at.to_rfc3339()
        )
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
