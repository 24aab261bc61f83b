//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which variants to create) and the [`backend`](super::backend)
//! (which does the pixel work). Tests swap in a mock backend and assert on
//! the recorded params without encoding anything.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Encoder choice for a full-size re-encode.
//! - [`ConvertParams`]: Re-encode at original dimensions.
//! - [`ThumbnailParams`]: Square cover-fit crop.
//! - [`FitParams`]: Contain-fit into a box with transparent padding.
//! - [`RasterizeParams`]: SVG to square PNG.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoder used for a full-size rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy WebP at the given quality.
    WebpLossy(Quality),
    /// Lossless PNG.
    Png,
    /// Baseline JPEG at the given quality. Alpha is dropped.
    Jpeg(Quality),
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebpLossy(_) => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg(_) => "jpg",
        }
    }
}

/// Re-encode an image at its original dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
}

/// Square thumbnail: resize to cover `size`×`size`, center-crop, encode lossy WebP.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: u32,
    pub quality: Quality,
}

/// Contain-fit into `width`×`height`, pad with transparency, encode PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Render an SVG into a `size`×`size` PNG, aspect kept and centered.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: u32,
}
