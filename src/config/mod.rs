//! Hierarchical configuration store
//!
//! Data and behaviour are kept apart:
//! - `ConfigNode`: the nested tree of sections and typed values
//! - `ConfigDict`: file reading/writing, defaults and provenance around it

mod error;
mod merge;
mod node;
mod provenance;
mod store;
mod writer;

pub use error::ConfigError;
pub use merge::deep_merge;
pub use node::{ConfigNode, Entry};
pub use provenance::FileRecord;
pub use store::{parse_text, ConfigDict};
pub use writer::to_text;
