//! Encoding cache for incremental image builds.
//!
//! Every source image fans out into nine encoded variants, and re-running the
//! optimizer over an unchanged tree should not pay for any of them again. This
//! module lets the optimizer skip an encode when the source bytes and the
//! variant's encoding parameters match a previous run.
//!
//! ## Cache keys
//!
//! Lookups are **content-addressed** by `source_hash` + `params_hash`, not by
//! output path, so moving an image to another subdirectory copies the old
//! output instead of re-encoding it.
//!
//! - **`source_hash`**: SHA-256 of the source file contents. Content-based
//!   rather than mtime-based so it survives `git checkout`.
//! - **`params_hash`**: SHA-256 of the variant kind and its numeric encoding
//!   parameters (size, quality). See [`hash_variant_params`].
//!
//! A cache hit requires a matching entry **and** the previously-written output
//! file still on disk. An entry recorded under the requested output path wins
//! over the content index, so byte-identical sources each keep their own
//! entries. Variants that failed to encode are never recorded.
//!
//! Entries not restored or inserted during a run (deleted sources, moved
//! outputs) are dropped by [`CacheManifest::prune_untouched`] before saving.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `images/.cache-manifest.json`. Output paths
//! inside it are relative to `images/`. Entries are kept in a `BTreeMap` so the
//! file is stable across runs.
//!
//! ## Bypassing the cache
//!
//! `--no-cache` starts from [`CacheManifest::empty`]. The manifest written at
//! the end of that run is fresh and usable by the next one.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the images directory.
const MANIFEST_FILENAME: &str = ".cache-manifest.json";

/// Bump to invalidate all existing caches when key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk cache manifest mapping output paths to their cache entries.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: BTreeMap<String, CacheEntry>,
    /// `"{source_hash}:{params_hash}"` → output path. Never serialized.
    #[serde(skip)]
    content_index: HashMap<String, String>,
    /// Output paths restored or inserted during this run. Never serialized.
    #[serde(skip)]
    touched: HashSet<String>,
}

/// How a variant was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Output already in place from a previous run.
    Cached,
    /// Output copied from the path a previous run wrote it to.
    Copied,
    /// Freshly encoded.
    Encoded,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStatus::Cached => f.write_str("cached"),
            CacheStatus::Copied => f.write_str("copied"),
            CacheStatus::Encoded => f.write_str("encoded"),
        }
    }
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
            content_index: HashMap::new(),
            touched: HashSet::new(),
        }
    }

    /// Load from `dir`. Missing, corrupt or outdated manifests load as empty.
    pub fn load(dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(manifest_path(dir)) else {
            return Self::empty();
        };
        let mut manifest: Self = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Self::empty(),
        };
        if manifest.version != MANIFEST_VERSION {
            return Self::empty();
        }
        manifest.content_index = manifest
            .entries
            .iter()
            .map(|(path, entry)| (content_key(&entry.source_hash, &entry.params_hash), path.clone()))
            .collect();
        manifest
    }

    pub fn save(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(dir), json)
    }

    /// Stored output path for these hashes, if its file still exists under `dir`.
    pub fn find_cached(&self, source_hash: &str, params_hash: &str, dir: &Path) -> Option<String> {
        let stored = self.content_index.get(&content_key(source_hash, params_hash))?;
        crate::layout::resolve(dir, stored)
            .exists()
            .then(|| stored.clone())
    }

    /// Record an output produced this run.
    pub fn insert(&mut self, output_path: String, source_hash: String, params_hash: String) {
        self.content_index
            .insert(content_key(&source_hash, &params_hash), output_path.clone());
        self.touched.insert(output_path.clone());
        self.entries.insert(
            output_path,
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }

    /// Drop every entry not restored or inserted since the manifest was loaded.
    pub fn prune_untouched(&mut self) {
        let touched = &self.touched;
        self.entries.retain(|path, _| touched.contains(path));
        self.content_index.retain(|_, path| touched.contains(path));
    }

    /// Try to satisfy `relative` (an output path under `dir`) from the cache.
    ///
    /// Returns `Cached` when the stored output is already at `relative`,
    /// `Copied` after copying it there from a previous path, and `None` on a
    /// miss. A successful copy is recorded under the new path.
    pub fn restore(
        &mut self,
        source_hash: &str,
        params_hash: &str,
        relative: &str,
        dir: &Path,
    ) -> io::Result<Option<CacheStatus>> {
        let in_place = self.entries.get(relative).is_some_and(|entry| {
            entry.source_hash == source_hash && entry.params_hash == params_hash
        });
        if in_place && crate::layout::resolve(dir, relative).exists() {
            self.touched.insert(relative.to_string());
            return Ok(Some(CacheStatus::Cached));
        }
        let Some(stored) = self.find_cached(source_hash, params_hash, dir) else {
            return Ok(None);
        };
        if stored == relative {
            self.touched.insert(stored);
            return Ok(Some(CacheStatus::Cached));
        }
        let target = crate::layout::resolve(dir, relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(crate::layout::resolve(dir, &stored), &target)?;
        self.insert(
            relative.to_string(),
            source_hash.to_string(),
            params_hash.to_string(),
        );
        Ok(Some(CacheStatus::Copied))
    }
}

fn content_key(source_hash: &str, params_hash: &str) -> String {
    format!("{}:{}", source_hash, params_hash)
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// SHA-256 hash of a variant's encoding parameters.
///
/// `kind` names the operation (`"thumbnail"`, `"convert-webp"`, ...) and
/// `values` its numeric inputs in a fixed order.
pub fn hash_variant_params(kind: &str, values: &[u32]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b"\0");
    for value in values {
        hasher.update(value.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub copies: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn record(&mut self, status: CacheStatus) {
        match status {
            CacheStatus::Cached => self.hits += 1,
            CacheStatus::Copied => self.copies += 1,
            CacheStatus::Encoded => self.misses += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.hits + self.copies + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.copies > 0 {
            write!(
                f,
                "{} cached, {} copied, {} encoded ({} total)",
                self.hits,
                self.copies,
                self.misses,
                self.total()
            )
        } else if self.hits > 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}

/// Location of the cache manifest inside `dir`.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}
