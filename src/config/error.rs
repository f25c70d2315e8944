//! Store errors
//!
//! Only file access and file syntax surface as errors. A value that fails a
//! typed parse rule falls back to a less specific one and never fails.

use cfgdict_codec::SyntaxError;
use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    #[error("no configuration file has been read")]
    EmptyProvenance,

    #[error("unsupported JSON value at {path:?}: {reason}")]
    UnsupportedJson { path: String, reason: String },
}

impl ConfigError {
    /// Whether the error came from file contents rather than file access.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::Parse { .. } | ConfigError::Encoding { .. })
    }
}
