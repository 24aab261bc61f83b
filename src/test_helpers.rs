//! Shared fixtures for the unit test suite.
//!
//! Tests build a throwaway asset package root in a `TempDir` and drop source
//! files into `icons/common/` and `images/common/`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_icon(tmp.path(), "bell-m", SIMPLE_SVG);
//! write_file(tmp.path(), "images/common/hero/banner.jpg", b"");
//! ```

use std::path::Path;

/// A 24x24 icon with a single filled path.
pub const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M4 4h16v16H4z" fill="#000"/>
</svg>
"##;

/// Write `bytes` to `root/<rel>`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

/// Write `icons/common/<name>.svg`.
pub fn write_icon(root: &Path, name: &str, svg: &str) {
    write_file(root, &format!("icons/common/{name}.svg"), svg.as_bytes());
}

/// Read a generated file relative to `root`.
pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("failed to read {rel}: {e}"))
}
