//! Configuration file fixtures
//!
//! - `base.cfg`: top-level values, a DEFAULT section, nested and escaped
//!   headers, matrices, numeric arrays and a malformed array
//! - `site.cfg`: overrides for `base.cfg`
//! - `malformed.cfg`: a line without a delimiter

use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn base_path() -> PathBuf {
    fixture("base.cfg")
}

pub fn site_path() -> PathBuf {
    fixture("site.cfg")
}

pub fn malformed_path() -> PathBuf {
    fixture("malformed.cfg")
}
