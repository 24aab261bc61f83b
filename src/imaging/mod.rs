//! Image processing: pure Rust decoding and resizing, libwebp for lossy WebP,
//! resvg for SVG rasterization.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Convert** | `webp::Encoder`, `image::codecs::{png, jpeg}` |
//! | **Thumbnail** | `resize_to_fill` (Lanczos3) → lossy WebP |
//! | **Fit** | Lanczos3 resize + overlay on a transparent canvas → PNG |
//! | **Rasterize** | `resvg` render into a `tiny_skia::Pixmap` → PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Variant planning plus execution against a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::density_dimensions;
pub use operations::{
    ImageSettings, PlannedVariant, VariantOp, execute, get_dimensions, plan_icon_rasters,
    plan_image_variants,
};
pub use params::{
    ConvertParams, FitParams, OutputFormat, Quality, RasterizeParams, ThumbnailParams,
};
pub use rust_backend::RustBackend;
