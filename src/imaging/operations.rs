//! High-level image operations.
//!
//! These functions combine layout rules and calculations with backend
//! execution. Planning is pure: it turns a source asset and the config into a
//! list of [`PlannedVariant`]s, each carrying the exact params the backend will
//! receive. [`execute`] then runs one variant.

use super::backend::{BackendError, ImageBackend};
use super::calculations::density_dimensions;
use super::params::{
    ConvertParams, FitParams, OutputFormat, Quality, RasterizeParams, ThumbnailParams,
};
use crate::cache::hash_variant_params;
use crate::config::AssetsConfig;
use crate::layout;
use crate::types::{Density, Platform};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// One backend call producing one output file.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantOp {
    Convert(ConvertParams),
    Thumbnail(ThumbnailParams),
    Fit(FitParams),
    Rasterize(RasterizeParams),
}

impl VariantOp {
    pub fn output(&self) -> &Path {
        match self {
            VariantOp::Convert(p) => &p.output,
            VariantOp::Thumbnail(p) => &p.output,
            VariantOp::Fit(p) => &p.output,
            VariantOp::Rasterize(p) => &p.output,
        }
    }

    /// Hash of everything that affects the encoded bytes except the source.
    pub fn params_hash(&self) -> String {
        match self {
            VariantOp::Convert(p) => match p.format {
                OutputFormat::WebpLossy(q) => hash_variant_params("convert-webp", &[q.value()]),
                OutputFormat::Png => hash_variant_params("convert-png", &[]),
                OutputFormat::Jpeg(q) => hash_variant_params("convert-jpeg", &[q.value()]),
            },
            VariantOp::Thumbnail(p) => {
                hash_variant_params("thumbnail", &[p.size, p.quality.value()])
            }
            VariantOp::Fit(p) => hash_variant_params("fit", &[p.width, p.height]),
            VariantOp::Rasterize(p) => hash_variant_params("rasterize", &[p.size]),
        }
    }
}

/// A variant the optimizer intends to produce for one source image.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedVariant {
    pub platform: Platform,
    /// Short human label: `webp`, `thumbnail 300x300`, `2x`, ...
    pub label: String,
    /// Output path relative to the `images/` directory, `/`-separated.
    pub relative: String,
    pub op: VariantOp,
}

/// Encoding settings for the image optimizer, resolved from config.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub webp_quality: Quality,
    pub thumbnail_quality: Quality,
    pub thumbnail_sizes: [u32; 3],
    pub jpeg_quality: Quality,
}

impl ImageSettings {
    pub fn from_config(config: &AssetsConfig) -> Self {
        Self {
            webp_quality: Quality::new(config.web.webp_quality),
            thumbnail_quality: Quality::new(config.web.thumbnail_quality),
            thumbnail_sizes: config.web.thumbnail_sizes,
            jpeg_quality: Quality::new(config.mobile.jpeg_quality),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self::from_config(&AssetsConfig::default())
    }
}

/// Plan every web and mobile variant of one source image.
///
/// `key` is the `<sub>/<base>` asset key and `original` its decoded
/// dimensions. Web variants come first, then mobile, in a fixed order.
pub fn plan_image_variants(
    source: &Path,
    key: &str,
    original: (u32, u32),
    images_dir: &Path,
    settings: &ImageSettings,
) -> Vec<PlannedVariant> {
    let web_dir = images_dir.join(layout::WEB_DIR);
    let mobile_dir = images_dir.join(layout::MOBILE_DIR);
    let mut variants = Vec::new();

    let mut web = |label: String, rel: String, op: VariantOp| {
        variants.push(PlannedVariant {
            platform: Platform::Web,
            label,
            relative: format!("{}/{}", layout::WEB_DIR, rel),
            op,
        });
    };

    for (label, format) in [
        ("webp", OutputFormat::WebpLossy(settings.webp_quality)),
        ("png", OutputFormat::Png),
    ] {
        let rel = match format {
            OutputFormat::Png => layout::web_png(key),
            _ => layout::web_webp(key),
        };
        let op = VariantOp::Convert(ConvertParams {
            source: source.to_path_buf(),
            output: layout::resolve(&web_dir, &rel),
            format,
        });
        web(label.to_string(), rel, op);
    }

    for size in settings.thumbnail_sizes {
        let rel = layout::web_thumbnail(size, key);
        let op = VariantOp::Thumbnail(ThumbnailParams {
            source: source.to_path_buf(),
            output: layout::resolve(&web_dir, &rel),
            size,
            quality: settings.thumbnail_quality,
        });
        web(format!("thumbnail {}", layout::thumbnail_dir(size)), rel, op);
    }

    let compressed = layout::mobile_compressed(key);
    variants.push(PlannedVariant {
        platform: Platform::Mobile,
        label: "compressed".to_string(),
        relative: format!("{}/{}", layout::MOBILE_DIR, compressed),
        op: VariantOp::Convert(ConvertParams {
            source: source.to_path_buf(),
            output: layout::resolve(&mobile_dir, &compressed),
            format: OutputFormat::Jpeg(settings.jpeg_quality),
        }),
    });

    for density in Density::ALL {
        let (width, height) = density_dimensions(original, density);
        let rel = layout::mobile_density(density, key);
        variants.push(PlannedVariant {
            platform: Platform::Mobile,
            label: density.to_string(),
            relative: format!("{}/{}", layout::MOBILE_DIR, rel),
            op: VariantOp::Fit(FitParams {
                source: source.to_path_buf(),
                output: layout::resolve(&mobile_dir, &rel),
                width,
                height,
            }),
        });
    }

    variants
}

/// Plan the three density rasters of one icon.
///
/// `sizes` are the square edge lengths for 1x, 2x and 3x.
pub fn plan_icon_rasters(
    source: &Path,
    name: &str,
    icons_dir: &Path,
    sizes: [u32; 3],
) -> Vec<(Density, RasterizeParams)> {
    Density::ALL
        .into_iter()
        .map(|density| {
            let params = RasterizeParams {
                source: source.to_path_buf(),
                output: layout::resolve(icons_dir, &layout::icon_raster(density, name)),
                size: sizes[density.index()],
            };
            (density, params)
        })
        .collect()
}

/// Run one variant on the backend, creating the output directory first.
pub fn execute(backend: &impl ImageBackend, op: &VariantOp) -> Result<()> {
    if let Some(parent) = op.output().parent() {
        std::fs::create_dir_all(parent)?;
    }
    match op {
        VariantOp::Convert(p) => backend.convert(p),
        VariantOp::Thumbnail(p) => backend.thumbnail(p),
        VariantOp::Fit(p) => backend.fit(p),
        VariantOp::Rasterize(p) => backend.rasterize(p),
    }
}
