//! Source asset discovery.
//!
//! Walks the two source trees and returns sorted [`SourceAsset`] lists. The
//! filesystem is the only input; nothing here decodes or writes files.
//!
//! ## Icons
//!
//! `icons/common/*.svg`, top level only. Subdirectories and non-SVG files are
//! ignored.
//!
//! ## Images
//!
//! `images/common/**`, recursive. A file is included when its lower-cased
//! extension is one of [`IMAGE_EXTENSIONS`]. Hidden files (leading `.`) are
//! skipped. The relative directory becomes the asset's `subdir` and is
//! mirrored under every output directory.
//!
//! Both walks sort by file name so enumeration order, and everything derived
//! from it, is stable across platforms.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Raster formats the optimizer accepts.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Icon,
    Image,
}

/// A file under a source directory. Never written by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAsset {
    /// Absolute (or root-joined) path to the file.
    pub path: PathBuf,
    /// Path relative to the source directory, `/`-separated.
    pub relative: String,
    /// Relative directory, `/`-separated, empty at the source root.
    pub subdir: String,
    /// File name without extension.
    pub base_name: String,
    /// Extension as found on disk.
    pub extension: String,
    pub kind: AssetKind,
}

impl SourceAsset {
    /// `<subdir>/<base>` key shared by every output path of this asset.
    pub fn key(&self) -> String {
        crate::layout::asset_key(&self.subdir, &self.base_name)
    }
}

/// List `icons/common/*.svg` in file name order.
pub fn scan_icons(dir: &Path) -> Result<Vec<SourceAsset>, ScanError> {
    walk(dir, Some(1), AssetKind::Icon, |ext| ext == "svg")
}

/// List every supported raster under `images/common/` in path order.
pub fn scan_images(dir: &Path) -> Result<Vec<SourceAsset>, ScanError> {
    walk(dir, None, AssetKind::Image, |ext| {
        IMAGE_EXTENSIONS.contains(&ext)
    })
}

fn walk(
    dir: &Path,
    max_depth: Option<usize>,
    kind: AssetKind,
    accept: impl Fn(&str) -> bool,
) -> Result<Vec<SourceAsset>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut assets = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(asset) = to_asset(dir, entry.path(), kind)
            && accept(&asset.extension.to_lowercase())
        {
            assets.push(asset);
        }
    }
    Ok(assets)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn to_asset(root: &Path, path: &Path, kind: AssetKind) -> Option<SourceAsset> {
    let relative_path = path.strip_prefix(root).ok()?;
    let extension = path.extension()?.to_string_lossy().to_string();
    let base_name = path.file_stem()?.to_string_lossy().to_string();

    let relative: Vec<String> = relative_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    let subdir = relative[..relative.len().saturating_sub(1)].join("/");

    Some(SourceAsset {
        path: path.to_path_buf(),
        relative: relative.join("/"),
        subdir,
        base_name,
        extension,
        kind,
    })
}
