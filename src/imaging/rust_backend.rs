//! Pure Rust image processing backend (plus libwebp for lossy WebP).
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF, BMP) | `image` crate |
//! | Resize | `image::imageops` with `Lanczos3` filter |
//! | Thumbnail crop | `image::DynamicImage::resize_to_fill` |
//! | Contain + pad | `resize_exact` + `imageops::overlay` on a transparent canvas |
//! | Encode → WebP (lossy) | `webp::Encoder` |
//! | Encode → PNG / JPEG | `image::codecs::{png, jpeg}` |
//! | SVG → PNG | `resvg` (usvg parse + tiny-skia render) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_contain_dimensions, centered_offset, square_fit_transform};
use super::params::{
    ConvertParams, FitParams, OutputFormat, Quality, RasterizeParams, ThumbnailParams,
};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save according to the requested output format.
fn save_image(img: &DynamicImage, path: &Path, format: OutputFormat) -> Result<(), BackendError> {
    match format {
        OutputFormat::WebpLossy(quality) => save_webp(img, path, quality),
        OutputFormat::Png => save_png(img, path),
        OutputFormat::Jpeg(quality) => save_jpeg(img, path, quality),
    }
}

/// Lossy WebP through libwebp. Only 8-bit RGB/RGBA layouts are accepted.
fn save_webp(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let encoder = webp::Encoder::from_image(&normalized)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encoder: {e}")))?;
    let encoded = encoder.encode(quality.value() as f32);
    std::fs::write(path, &*encoded)?;
    Ok(())
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

/// JPEG has no alpha channel; transparent pixels are flattened by dropping alpha.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to read dimensions of {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Dimensions { width, height })
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.format)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        // Fill-resize then center-crop to exact dimensions
        let filled = img.resize_to_fill(params.size, params.size, FilterType::Lanczos3);
        save_webp(&filled, &params.output, params.quality)
    }

    fn fit(&self, params: &FitParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let target = (params.width, params.height);
        let (w, h) = calculate_contain_dimensions((img.width(), img.height()), target);
        let resized = img.resize_exact(w, h, FilterType::Lanczos3).to_rgba8();

        let mut canvas = RgbaImage::from_pixel(params.width, params.height, Rgba([255, 255, 255, 0]));
        let (x, y) = centered_offset((w, h), target);
        image::imageops::overlay(&mut canvas, &resized, x as i64, y as i64);

        save_png(&DynamicImage::ImageRgba8(canvas), &params.output)
    }

    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError> {
        let data = std::fs::read(&params.source)?;
        let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to parse SVG {}: {}",
                params.source.display(),
                e
            ))
        })?;

        let canvas = tree.size();
        let (scale, tx, ty) = square_fit_transform((canvas.width(), canvas.height()), params.size);
        let mut pixmap = tiny_skia::Pixmap::new(params.size, params.size).ok_or_else(|| {
            BackendError::ProcessingFailed(format!("Invalid raster size {}", params.size))
        })?;
        let transform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .save_png(&params.output)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
    }
}
