//! Shared types used across all pipeline stages.
//!
//! The icon and image stages produce reports built from these types, and the
//! index stage renders generated code from them. Nothing here touches the
//! filesystem.

use std::fmt;

/// Target platform of a generated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Web,
    Mobile,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Web => f.write_str("web"),
            Platform::Mobile => f.write_str("mobile"),
        }
    }
}

/// Pixel-density bucket for mobile assets.
///
/// The original image is treated as the `3x` reference; lower buckets are
/// scaled down from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Density {
    X1,
    X2,
    X3,
}

impl Density {
    pub const ALL: [Density; 3] = [Density::X1, Density::X2, Density::X3];

    /// Directory name and resolution label (`"1x"`, `"2x"`, `"3x"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Density::X1 => "1x",
            Density::X2 => "2x",
            Density::X3 => "3x",
        }
    }

    pub fn multiplier(self) -> u32 {
        match self {
            Density::X1 => 1,
            Density::X2 => 2,
            Density::X3 => 3,
        }
    }

    /// Position in [`Density::ALL`], used to index per-density config arrays.
    pub fn index(self) -> usize {
        self.multiplier() as usize - 1
    }

    /// Nearest supported bucket for a device pixel ratio.
    ///
    /// Boundaries are inclusive: `2.0` selects `2x`, `3.0` selects `3x`.
    pub fn select(pixel_ratio: f64) -> Self {
        if pixel_ratio >= 3.0 {
            Density::X3
        } else if pixel_ratio >= 2.0 {
            Density::X2
        } else {
            Density::X1
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution label for a device pixel ratio.
///
/// Mirrors the `selectResolution` helper emitted into the Flutter index.
pub fn select_resolution(pixel_ratio: f64) -> &'static str {
    Density::select(pixel_ratio).as_str()
}

/// Named thumbnail size class for web images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailSize {
    Small,
    Medium,
    Large,
}

impl ThumbnailSize {
    pub const ALL: [ThumbnailSize; 3] = [
        ThumbnailSize::Small,
        ThumbnailSize::Medium,
        ThumbnailSize::Large,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThumbnailSize::Small => "small",
            ThumbnailSize::Medium => "medium",
            ThumbnailSize::Large => "large",
        }
    }

    /// Position in [`ThumbnailSize::ALL`], used to index the configured pixel sizes.
    pub fn index(self) -> usize {
        match self {
            ThumbnailSize::Small => 0,
            ThumbnailSize::Medium => 1,
            ThumbnailSize::Large => 2,
        }
    }
}

/// An icon that made it through stage 1.
///
/// Carries every name the generated code needs so the index stage never has
/// to re-derive anything from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    /// Source file base name (`bell-m`). Also the sprite symbol id.
    pub name: String,
    /// Web component name (`BellM`).
    pub component: String,
    /// Flutter field name (`bellM`).
    pub field: String,
    /// Assigned font code point.
    pub code_point: u32,
    /// Densities whose PNG rendition was written.
    pub rasters: Vec<Density>,
}

/// An image that made it through stage 2 on at least one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedImage {
    /// Relative subdirectory under the source root, `/`-separated, empty at the root.
    pub subdir: String,
    /// File base name without extension.
    pub base_name: String,
    /// Web binding identifier (`hero_banner`).
    pub binding: String,
    /// Mobile constant identifier (`HERO_BANNER`).
    pub constant: String,
    /// Original pixel dimensions.
    pub dimensions: (u32, u32),
    /// All web variants were produced.
    pub web: bool,
    /// All mobile variants were produced.
    pub mobile: bool,
}

impl OptimizedImage {
    /// `<subdir>/<base_name>` (or just `<base_name>` at the root).
    pub fn key(&self) -> String {
        crate::layout::asset_key(&self.subdir, &self.base_name)
    }
}
