//! # Pickly Assets
//!
//! Build pipeline for a shared design-asset package. Hand-authored SVG icons
//! and raster images go in; optimized renditions for web and Flutter clients
//! come out, together with generated index code that references them.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Icons    icons/common/*.svg  →  icons/web/, icons/mobile/{1x,2x,3x}/
//! 2. Images   images/common/**    →  images/web/, images/mobile/
//! 3. Indexes  reports of 1 and 2  →  images/*/index.*, index.js, index.dart
//! ```
//!
//! Stages share nothing but the filesystem and the in-memory reports they
//! return. Stage 3 renders only what stages 1 and 2 report as produced, so
//! generated code never references a file that failed to encode.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`icons`] | Stage 1: clean SVGs, JSX components, sprite, rasters, icon registries |
//! | [`optimize`] | Stage 2: WebP/PNG/thumbnails for web, JPEG and density PNGs for mobile |
//! | [`index`] | Stage 3: image indexes and package entry points |
//! | [`codegen`] | Pure templates for every generated JS, JSX, CSS, SVG and Dart file |
//! | [`imaging`] | Backend trait, pure-Rust backend, variant planning |
//! | [`cache`] | Content-addressed encoding cache for incremental runs |
//! | [`config`] | `assets.toml` loading, merging and validation |
//! | [`scan`] | Sorted enumeration of source files |
//! | [`svg`] | Whitespace cleaning and structural inspection of SVG markup |
//! | [`naming`] | Identifier derivation and collision detection |
//! | [`layout`] | Directory conventions and output path rules |
//! | [`types`] | Densities, thumbnail sizes and the per-asset records |
//! | [`output`] | Progress events and console formatting |
//!
//! # Design Decisions
//!
//! ## Determinism
//!
//! Sources are enumerated in file name order and parallel results are
//! collected in that order. Code points, identifiers and generated files are
//! therefore a pure function of the source tree and the config. Re-running
//! over an unchanged tree rewrites byte-identical index files.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resizing and PNG/JPEG encoding use the `image` crate, SVG
//! rasterization uses `resvg`. Lossy WebP is the one native dependency
//! (libwebp via the `webp` crate), since `image` only writes lossless WebP.
//! No ImageMagick, no sharp, no Node.
//!
//! ## Skip, Don't Abort
//!
//! A broken source file or a failed variant is reported and skipped. Only
//! stage-level problems abort a stage: a missing source directory, an
//! identifier collision, an invalid config or a directory that cannot be
//! created.

pub mod cache;
pub mod codegen;
pub mod config;
pub mod icons;
pub mod imaging;
pub mod index;
pub mod layout;
pub mod naming;
pub mod optimize;
pub mod output;
pub mod scan;
pub mod svg;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
