//! cfgdict - hierarchical typed configuration files
//!
//! Loads INI-style files with dotted section headers into a nested tree of
//! typed values (integers, floats, strings, lists, matrices and numeric
//! arrays), merges several files in order, and writes the tree back out in
//! the same format.
//!
//! ```no_run
//! use cfgdict::{ConfigDict, ConfigNode};
//!
//! let mut config = ConfigDict::new(ConfigNode::new());
//! config.read(&["base.cfg", "site.cfg"], None)?;
//! let gain = config.get_f64("detector.gain");
//! config.write("merged.cfg", None)?;
//! # Ok::<(), cfgdict::ConfigError>(())
//! ```

pub mod config;

pub use cfgdict_codec as codec;
pub use cfgdict_codec::{NumericArray, Scalar, Value};
pub use config::{parse_text, ConfigDict, ConfigError, ConfigNode, Entry, FileRecord};
