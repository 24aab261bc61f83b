//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::Density;

/// Target dimensions for a mobile density rendition.
///
/// The original is treated as the `3x` reference, so each axis becomes
/// `round(original / 3 * density)`, never below one pixel.
///
/// ```
/// # use pickly_assets::imaging::density_dimensions;
/// # use pickly_assets::types::Density;
/// assert_eq!(density_dimensions((900, 600), Density::X1), (300, 200));
/// assert_eq!(density_dimensions((900, 600), Density::X3), (900, 600));
/// ```
pub fn density_dimensions(original: (u32, u32), density: Density) -> (u32, u32) {
    let scale = |edge: u32| -> u32 {
        let scaled = (edge as f64 / 3.0 * density.multiplier() as f64).round() as u32;
        scaled.max(1)
    };
    (scale(original.0), scale(original.1))
}

/// Largest dimensions with the source aspect ratio that fit inside `target`.
///
/// One dimension matches the target exactly; the other is equal or smaller.
pub fn calculate_contain_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: width matches, height shrinks
        let h = (tgt_w as f64 / src_aspect).round() as u32;
        (tgt_w, h.clamp(1, tgt_h))
    } else {
        // Source is taller: height matches, width shrinks
        let w = (tgt_h as f64 * src_aspect).round() as u32;
        (w.clamp(1, tgt_w), tgt_h)
    }
}

/// Offset that centers `inner` inside `outer` (integer division, top-left bias).
pub fn centered_offset(inner: (u32, u32), outer: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(inner.0) / 2,
        outer.1.saturating_sub(inner.1) / 2,
    )
}

/// Uniform scale and translation that fit a vector canvas into a square.
///
/// Returns `(scale, tx, ty)`. The canvas is scaled to fit `size` on its longer
/// side and centered on the shorter one.
pub fn square_fit_transform(canvas: (f32, f32), size: u32) -> (f32, f32, f32) {
    let (w, h) = canvas;
    let size = size as f32;
    let scale = (size / w).min(size / h);
    let tx = (size - w * scale) / 2.0;
    let ty = (size - h * scale) / 2.0;
    (scale, tx, ty)
}
