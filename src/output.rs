//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every asset is shown by its identity first (positional index plus the
//! generated name), with its source path as an indented context line. Variant
//! status lines follow, so the output doubles as an inventory of what the run
//! produced.
//!
//! # Output Format
//!
//! ## Icons
//!
//! ```text
//! ==> Stage 1: Generating icons from icons/common
//! 001 BellM
//!     Source: bell-m.svg
//!     Rasters: 1x 2x 3x
//! warning: icons/common/broken.svg: No root <svg> element
//! Generated 2 icons, 1 skipped
//! ```
//!
//! ## Images
//!
//! ```text
//! ==> Stage 2: Optimizing images from images/common
//! 001 hero/banner (900x600)
//!     Source: hero/banner.jpg
//!     webp: encoded
//!     thumbnail 300x300: cached
//!     2x: failed
//! Optimized 1 image: 1 web, 0 mobile, 0 skipped
//! Cache: 7 cached, 1 encoded (8 total)
//! ```
//!
//! # Architecture
//!
//! Stage workers send [`PipelineEvent`]s over an `mpsc` channel to a single
//! printer thread. Each `format_*` function returns `Vec<String>` and does no
//! I/O, so every line is testable. Warnings go to stderr, everything else to
//! stdout.

use crate::cache::CacheStatus;
use crate::icons::IconReport;
use crate::optimize::ImageReport;
use crate::types::Density;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Progress reported by stage workers while they run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    IconGenerated {
        position: usize,
        component: String,
        source: String,
        rasters: Vec<Density>,
    },
    ImageOptimized {
        position: usize,
        key: String,
        source: String,
        dimensions: (u32, u32),
        variants: Vec<VariantInfo>,
    },
    /// An asset or one of its variants could not be produced.
    Warning {
        asset: String,
        variant: Option<String>,
        message: String,
    },
}

impl PipelineEvent {
    pub fn is_warning(&self) -> bool {
        matches!(self, PipelineEvent::Warning { .. })
    }
}

/// Send an event if anyone is listening.
pub(crate) fn send(events: &Option<Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A closed channel only means the printer has gone away.
        tx.send(event).ok();
    }
}

/// Outcome of one variant, as shown in the image block.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantInfo {
    pub label: String,
    pub status: VariantStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Cached,
    Copied,
    Encoded,
    Failed,
}

impl From<CacheStatus> for VariantStatus {
    fn from(status: CacheStatus) -> Self {
        match status {
            CacheStatus::Cached => VariantStatus::Cached,
            CacheStatus::Copied => VariantStatus::Copied,
            CacheStatus::Encoded => VariantStatus::Encoded,
        }
    }
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// Events
// ============================================================================

pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::IconGenerated {
            position,
            component,
            source,
            rasters,
        } => {
            let rasters = if rasters.is_empty() {
                "none".to_string()
            } else {
                rasters
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            vec![
                format!("{} {}", format_index(*position), component),
                format!("    Source: {}", source),
                format!("    Rasters: {}", rasters),
            ]
        }
        PipelineEvent::ImageOptimized {
            position,
            key,
            source,
            dimensions,
            variants,
        } => {
            let mut lines = vec![
                format!(
                    "{} {} ({}x{})",
                    format_index(*position),
                    key,
                    dimensions.0,
                    dimensions.1
                ),
                format!("    Source: {}", source),
            ];
            for variant in variants {
                let status = match variant.status {
                    VariantStatus::Cached => "cached",
                    VariantStatus::Copied => "copied",
                    VariantStatus::Encoded => "encoded",
                    VariantStatus::Failed => "failed",
                };
                lines.push(format!("    {}: {}", variant.label, status));
            }
            lines
        }
        PipelineEvent::Warning {
            asset,
            variant,
            message,
        } => match variant {
            Some(variant) => vec![format!("warning: {} [{}]: {}", asset, variant, message)],
            None => vec![format!("warning: {}: {}", asset, message)],
        },
    }
}

// ============================================================================
// Stage summaries
// ============================================================================

pub fn format_stage_banner(stage: usize, action: &str, source: &Path) -> String {
    format!("==> Stage {}: {} from {}", stage, action, source.display())
}

pub fn format_icon_summary(report: &IconReport) -> Vec<String> {
    let mut summary = format!("Generated {}", plural(report.icons.len(), "icon"));
    if report.skipped > 0 {
        summary.push_str(&format!(", {} skipped", report.skipped));
    }
    let mut lines = vec![summary];
    if let (Some(first), Some(last)) = (report.icons.first(), report.icons.last()) {
        lines.push(format!(
            "Code points: {:#06x}..={:#06x}",
            first.code_point, last.code_point
        ));
    }
    lines
}

pub fn format_image_summary(report: &ImageReport) -> Vec<String> {
    let web = report.images.iter().filter(|i| i.web).count();
    let mobile = report.images.iter().filter(|i| i.mobile).count();
    vec![
        format!(
            "Optimized {}: {} web, {} mobile, {} skipped",
            plural(report.images.len(), "image"),
            web,
            mobile,
            report.skipped
        ),
        format!("Cache: {}", report.cache_stats),
    ]
}

/// One line per generated index file, relative to the package root.
pub fn format_index_output(written: &[PathBuf], root: &Path) -> Vec<String> {
    written
        .iter()
        .map(|path| {
            let shown = path.strip_prefix(root).unwrap_or(path);
            format!("Wrote {}", shown.display())
        })
        .collect()
}
