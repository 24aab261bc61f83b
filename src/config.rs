//! Pipeline configuration.
//!
//! Handles loading, validating, and merging `assets.toml`. The file lives in
//! the asset package root and is optional: stock defaults reproduce the
//! standard layout, and a user file only needs the keys it overrides.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [brand]
//! name = "Pickly"           # Prefix for generated classes and CSS
//! version = "1.0.0"         # Exported in ASSET_MANIFEST
//!
//! [web]
//! base_url = "/assets"      # URL prefix of served assets
//! base_url_env = "NEXT_PUBLIC_ASSET_URL"  # Runtime override read by index.js
//! webp_quality = 85         # Lossy WebP rendition
//! thumbnail_quality = 80    # Thumbnail WebP quality
//! thumbnail_sizes = [150, 300, 600]  # small, medium, large (square px)
//!
//! [mobile]
//! jpeg_quality = 85         # Compressed baseline
//!
//! [icons]
//! raster_sizes = [24, 48, 72]   # 1x, 2x, 3x PNG edge length
//! code_point_base = 0xe000      # First assigned code point
//! fallback_code_point = 0xe000  # Returned for unknown icon names
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file within the asset package root.
pub const CONFIG_FILENAME: &str = "assets.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `assets.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Naming of generated classes, CSS prefixes and the manifest version.
    pub brand: BrandConfig,
    /// Web renditions and URL settings.
    pub web: WebConfig,
    /// Mobile renditions.
    pub mobile: MobileConfig,
    /// Icon rasterization and code point registry.
    pub icons: IconsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AssetsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, quality) in [
            ("web.webp_quality", self.web.webp_quality),
            ("web.thumbnail_quality", self.web.thumbnail_quality),
            ("mobile.jpeg_quality", self.mobile.jpeg_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Validation(format!("{key} must be 1-100")));
            }
        }
        check_ascending("web.thumbnail_sizes", &self.web.thumbnail_sizes)?;
        check_ascending("icons.raster_sizes", &self.icons.raster_sizes)?;
        if self.web.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "web.base_url must not be empty".into(),
            ));
        }
        if !is_identifier(&self.brand.name) {
            return Err(ConfigError::Validation(
                "brand.name must be an ASCII identifier".into(),
            ));
        }
        if !is_env_name(&self.web.base_url_env) {
            return Err(ConfigError::Validation(
                "web.base_url_env must be an environment variable name ([A-Za-z_][A-Za-z0-9_]*)"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn check_ascending(key: &str, sizes: &[u32; 3]) -> Result<(), ConfigError> {
    if sizes[0] == 0 || sizes.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ConfigError::Validation(format!(
            "{key} must be non-zero and strictly ascending"
        )));
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Inserted verbatim as `process.env.<name>` in the package index.
fn is_env_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Naming of generated code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    /// Prefix for generated classes (`PicklyIcons`), CSS (`pickly-icon`) and the
    /// Dart library (`pickly_assets`).
    pub name: String,
    /// Version string exported in `ASSET_MANIFEST`.
    pub version: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "Pickly".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

impl BrandConfig {
    /// `PicklyIcons`
    pub fn icons_class(&self) -> String {
        format!("{}Icons", self.name)
    }

    /// `PicklyImages`
    pub fn images_class(&self) -> String {
        format!("{}Images", self.name)
    }

    /// `pickly-icon`
    pub fn css_prefix(&self) -> String {
        format!("{}-icon", self.name.to_lowercase())
    }

    /// `pickly_assets`
    pub fn dart_library(&self) -> String {
        format!("{}_assets", self.name.to_lowercase())
    }
}

/// Web renditions and URL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebConfig {
    /// URL prefix under which the package's generated tree is served.
    pub base_url: String,
    /// Environment variable the generated `index.js` reads to override `base_url`.
    pub base_url_env: String,
    /// Lossy WebP quality for the full-size rendition.
    pub webp_quality: u32,
    /// Lossy WebP quality for thumbnails.
    pub thumbnail_quality: u32,
    /// Square thumbnail edge lengths for `small`, `medium`, `large`.
    pub thumbnail_sizes: [u32; 3],
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            base_url: "/assets".to_string(),
            base_url_env: "NEXT_PUBLIC_ASSET_URL".to_string(),
            webp_quality: 85,
            thumbnail_quality: 80,
            thumbnail_sizes: [150, 300, 600],
        }
    }
}

/// Mobile renditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MobileConfig {
    /// JPEG quality of the compressed baseline.
    pub jpeg_quality: u32,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self { jpeg_quality: 85 }
    }
}

/// Icon rasterization and code point registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// PNG edge length for `1x`, `2x`, `3x`.
    pub raster_sizes: [u32; 3],
    /// Code point of the first icon; later icons count up from here.
    pub code_point_base: u32,
    /// Code point returned for names missing from the registry.
    pub fallback_code_point: u32,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            raster_sizes: [24, 48, 72],
            code_point_base: 0xe000,
            fallback_code_point: 0xe000,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AssetsConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `assets.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge user values on top of stock defaults, reject unknown keys, validate.
pub fn load_config(root: &Path) -> Result<AssetsConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: AssetsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `assets.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Asset Pipeline Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Generated code naming
# ---------------------------------------------------------------------------
[brand]
# Prefix for generated classes (PicklyIcons, PicklyImages), the icon CSS
# prefix (pickly-icon) and the Dart library (pickly_assets).
name = "Pickly"

# Version exported in ASSET_MANIFEST.
version = "1.0.0"

# ---------------------------------------------------------------------------
# Web renditions
# ---------------------------------------------------------------------------
[web]
# URL prefix under which the generated tree is served.
base_url = "/assets"

# Environment variable read by the generated index.js to override base_url.
base_url_env = "NEXT_PUBLIC_ASSET_URL"

# Lossy WebP quality (1-100).
webp_quality = 85

# Thumbnail WebP quality (1-100).
thumbnail_quality = 80

# Square thumbnail sizes in pixels: small, medium, large.
thumbnail_sizes = [150, 300, 600]

# ---------------------------------------------------------------------------
# Mobile renditions
# ---------------------------------------------------------------------------
[mobile]
# Compressed baseline JPEG quality (1-100).
jpeg_quality = 85

# ---------------------------------------------------------------------------
# Icons
# ---------------------------------------------------------------------------
[icons]
# PNG edge length for 1x, 2x, 3x.
raster_sizes = [24, 48, 72]

# Code point of the first icon (in enumeration order); later icons count up.
code_point_base = 0xe000

# Code point returned by the registry for unknown names.
fallback_code_point = 0xe000

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
