//! Image optimization.
//!
//! Stage 2 of the asset pipeline. Every raster under `images/common/` fans
//! out into nine variants:
//!
//! ```text
//! images/web/webp/<sub>/<base>.webp                 lossy WebP, web.webp_quality
//! images/web/png/<sub>/<base>.png                   lossless PNG, max compression
//! images/web/thumbnails/{150,300,600}x…/<sub>/<base>.webp   square cover crops
//! images/mobile/compressed/<sub>/<base>.jpg         JPEG, mobile.jpeg_quality
//! images/mobile/{1x,2x,3x}/<sub>/<base>.png         contain-fit, original = 3x
//! ```
//!
//! Images are processed in parallel with rayon. Variants of a single image
//! run in order on one worker.
//!
//! ## Partial failure
//!
//! A source that cannot be decoded is skipped with a warning. A variant that
//! fails is reported and the others still run. An image appears in a
//! platform's index only when every variant of that platform succeeded, so
//! generated code never points at a missing file.
//!
//! ## Cache
//!
//! Before encoding, each variant is looked up in the [`CacheManifest`] by
//! source hash and params hash. See [`crate::cache`] for the rules.

use crate::cache::{self, CacheManifest, CacheStats, CacheStatus};
use crate::config::AssetsConfig;
use crate::imaging::{
    ImageBackend, ImageSettings, PlannedVariant, RustBackend, execute, get_dimensions,
    plan_image_variants,
};
use crate::layout;
use crate::naming::{self, Collision};
use crate::output::{PipelineEvent, VariantInfo, VariantStatus, send};
use crate::scan::{self, ScanError, SourceAsset};
use crate::types::{OptimizedImage, Platform};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image name collision: {0}")]
    Collision(Collision),
}

/// What stage 2 produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    /// Images available on at least one platform, in enumeration order.
    pub images: Vec<OptimizedImage>,
    /// Sources skipped entirely (undecodable, or every variant failed).
    pub skipped: usize,
    pub cache_stats: CacheStats,
}

/// Outcome of one source image.
struct ImageOutcome {
    image: Option<OptimizedImage>,
    statuses: Vec<CacheStatus>,
}

/// Run stage 2 with the production backend.
pub fn optimize_images(
    root: &Path,
    config: &AssetsConfig,
    use_cache: bool,
    events: Option<Sender<PipelineEvent>>,
) -> Result<ImageReport, OptimizeError> {
    optimize_images_with_backend(&RustBackend::new(), root, config, use_cache, events)
}

/// Run stage 2 with any backend (allows testing with mock).
pub fn optimize_images_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &AssetsConfig,
    use_cache: bool,
    events: Option<Sender<PipelineEvent>>,
) -> Result<ImageReport, OptimizeError> {
    let sources = scan::scan_images(&layout::image_source_dir(root))?;
    check_collisions(&sources)?;

    let images_dir = root.join(layout::IMAGES_DIR);
    std::fs::create_dir_all(layout::image_web_dir(root))?;
    std::fs::create_dir_all(layout::image_mobile_dir(root))?;

    let manifest = if use_cache {
        CacheManifest::load(&images_dir)
    } else {
        CacheManifest::empty()
    };
    let cache = Mutex::new(manifest);
    let settings = ImageSettings::from_config(config);

    let outcomes: Vec<ImageOutcome> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            process_image(backend, i + 1, source, &images_dir, &settings, &cache, &events)
        })
        .collect();

    let mut cache_stats = CacheStats::default();
    let mut images = Vec::new();
    let mut skipped = 0;
    for outcome in outcomes {
        for status in outcome.statuses {
            cache_stats.record(status);
        }
        match outcome.image {
            Some(image) => images.push(image),
            None => skipped += 1,
        }
    }

    let mut manifest = cache.into_inner().unwrap_or_else(|e| e.into_inner());
    manifest.prune_untouched();
    manifest.save(&images_dir)?;

    Ok(ImageReport {
        images,
        skipped,
        cache_stats,
    })
}

/// Reject source sets where two files derive the same JS binding or Dart
/// constant. This also catches `logo.png` next to `logo.jpg`.
fn check_collisions(sources: &[SourceAsset]) -> Result<(), OptimizeError> {
    let derivations: [fn(&str) -> Option<String>; 2] = [naming::js_binding, naming::dart_constant];
    for derive in derivations {
        let idents: Vec<(&str, String)> = sources
            .iter()
            .filter_map(|s| Some((s.relative.as_str(), derive(&s.base_name)?)))
            .collect();
        if let Some(collision) =
            naming::find_collision(idents.iter().map(|(rel, ident)| (*rel, ident.as_str())))
        {
            return Err(OptimizeError::Collision(collision));
        }
    }
    Ok(())
}

fn process_image(
    backend: &impl ImageBackend,
    position: usize,
    source: &SourceAsset,
    images_dir: &Path,
    settings: &ImageSettings,
    cache: &Mutex<CacheManifest>,
    events: &Option<Sender<PipelineEvent>>,
) -> ImageOutcome {
    let asset = format!(
        "{}/{}/{}",
        layout::IMAGES_DIR,
        layout::SOURCE_DIR,
        source.relative
    );
    let warn = |variant: Option<&str>, message: String| {
        send(
            events,
            PipelineEvent::Warning {
                asset: asset.clone(),
                variant: variant.map(str::to_string),
                message,
            },
        )
    };
    let skip = ImageOutcome {
        image: None,
        statuses: Vec::new(),
    };

    let (Some(binding), Some(constant)) = (
        naming::js_binding(&source.base_name),
        naming::dart_constant(&source.base_name),
    ) else {
        warn(None, format!("'{}' does not produce an identifier", source.base_name));
        return skip;
    };

    let dimensions = match get_dimensions(backend, &source.path) {
        Ok(dims) => dims,
        Err(e) => {
            warn(None, e.to_string());
            return skip;
        }
    };
    let source_hash = match cache::hash_file(&source.path) {
        Ok(hash) => hash,
        Err(e) => {
            warn(None, format!("Failed to read: {e}"));
            return skip;
        }
    };

    let key = source.key();
    let variants = plan_image_variants(&source.path, &key, dimensions, images_dir, settings);

    let mut infos = Vec::with_capacity(variants.len());
    let mut statuses = Vec::with_capacity(variants.len());
    let mut web = true;
    let mut mobile = true;
    for variant in &variants {
        let status = match produce_variant(backend, variant, &source_hash, images_dir, cache) {
            Ok(status) => {
                statuses.push(status);
                VariantStatus::from(status)
            }
            Err(message) => {
                warn(Some(&variant.label), message);
                match variant.platform {
                    Platform::Web => web = false,
                    Platform::Mobile => mobile = false,
                }
                VariantStatus::Failed
            }
        };
        infos.push(VariantInfo {
            label: variant.label.clone(),
            status,
        });
    }

    send(
        events,
        PipelineEvent::ImageOptimized {
            position,
            key,
            source: source.relative.clone(),
            dimensions,
            variants: infos,
        },
    );

    let image = (web || mobile).then(|| OptimizedImage {
        subdir: source.subdir.clone(),
        base_name: source.base_name.clone(),
        binding,
        constant,
        dimensions,
        web,
        mobile,
    });
    ImageOutcome { image, statuses }
}

/// Restore one variant from the cache or encode it.
///
/// The cache lock is only held for lookups and inserts, never during encoding.
fn produce_variant(
    backend: &impl ImageBackend,
    variant: &PlannedVariant,
    source_hash: &str,
    images_dir: &Path,
    cache: &Mutex<CacheManifest>,
) -> Result<CacheStatus, String> {
    let params_hash = variant.op.params_hash();
    {
        let mut manifest = cache.lock().map_err(|e| e.to_string())?;
        // A failed copy falls through to a fresh encode.
        if let Ok(Some(status)) =
            manifest.restore(source_hash, &params_hash, &variant.relative, images_dir)
        {
            return Ok(status);
        }
    }

    execute(backend, &variant.op).map_err(|e| e.to_string())?;

    cache
        .lock()
        .map_err(|e| e.to_string())?
        .insert(variant.relative.clone(), source_hash.to_string(), params_hash);
    Ok(CacheStatus::Encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::write_file;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for rel in files {
            write_file(tmp.path(), &format!("images/common/{rel}"), rel.as_bytes());
        }
        tmp
    }

    fn run(backend: &MockBackend, root: &Path, use_cache: bool) -> ImageReport {
        optimize_images_with_backend(backend, root, &AssetsConfig::default(), use_cache, None)
            .unwrap()
    }

    #[test]
    fn produces_nine_variants_per_image() {
        let tmp = setup(&["hero/banner.jpg"]);
        let backend = MockBackend::new().with_image("banner.jpg", 900, 600);

        let report = run(&backend, tmp.path(), true);

        assert_eq!(report.images.len(), 1);
        let image = &report.images[0];
        assert_eq!(image.key(), "hero/banner");
        assert_eq!(image.binding, "banner");
        assert_eq!(image.constant, "BANNER");
        assert_eq!(image.dimensions, (900, 600));
        assert!(image.web && image.mobile);

        assert_eq!(backend.outputs().len(), 9);
        assert_eq!(report.cache_stats.misses, 9);
        for rel in [
            "images/web/webp/hero/banner.webp",
            "images/web/thumbnails/600x600/hero/banner.webp",
            "images/mobile/compressed/hero/banner.jpg",
            "images/mobile/3x/hero/banner.png",
        ] {
            assert!(tmp.path().join(rel).exists(), "{rel}");
        }
    }

    #[test]
    fn undecodable_source_is_skipped() {
        let tmp = setup(&["good.png", "broken.png"]);
        let backend = MockBackend::new().with_image("good.png", 100, 100);
        let (tx, rx) = mpsc::channel();

        let report = optimize_images_with_backend(
            &backend,
            tmp.path(),
            &AssetsConfig::default(),
            true,
            Some(tx),
        )
        .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.images[0].base_name, "good");

        let warnings: Vec<_> = rx.iter().filter(|e| e.is_warning()).collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            PipelineEvent::Warning { asset, variant: None, .. } if asset == "images/common/broken.png"
        ));
    }

    #[test]
    fn failed_mobile_variant_drops_mobile_only() {
        let tmp = setup(&["logo.png"]);
        let backend = MockBackend::new()
            .with_image("logo.png", 300, 300)
            .failing_output("mobile/2x");
        let (tx, rx) = mpsc::channel();

        let report = optimize_images_with_backend(
            &backend,
            tmp.path(),
            &AssetsConfig::default(),
            true,
            Some(tx),
        )
        .unwrap();

        let image = &report.images[0];
        assert!(image.web);
        assert!(!image.mobile);
        assert_eq!(report.cache_stats.misses, 8);

        let events: Vec<_> = rx.iter().collect();
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::Warning { variant: Some(v), .. } if v == "2x"
        )));
        let Some(PipelineEvent::ImageOptimized { variants, .. }) =
            events.iter().find(|e| !e.is_warning())
        else {
            panic!("no image event");
        };
        let failed: Vec<_> = variants
            .iter()
            .filter(|v| v.status == VariantStatus::Failed)
            .map(|v| v.label.as_str())
            .collect();
        assert_eq!(failed, vec!["2x"]);
    }

    #[test]
    fn image_failing_everywhere_is_skipped() {
        let tmp = setup(&["logo.png"]);
        let backend = MockBackend::new()
            .with_image("logo.png", 300, 300)
            .failing_output("logo");

        let report = run(&backend, tmp.path(), true);
        assert!(report.images.is_empty());
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn rerun_hits_cache() {
        let tmp = setup(&["hero/banner.jpg"]);
        let backend = MockBackend::new().with_image("banner.jpg", 900, 600);
        run(&backend, tmp.path(), true);

        let second = MockBackend::new().with_image("banner.jpg", 900, 600);
        let report = run(&second, tmp.path(), true);

        assert_eq!(report.cache_stats.hits, 9);
        assert_eq!(report.cache_stats.misses, 0);
        assert!(second.outputs().is_empty());
    }

    #[test]
    fn no_cache_reencodes_but_saves_manifest() {
        let tmp = setup(&["logo.png"]);
        let backend = MockBackend::new().with_image("logo.png", 90, 90);
        run(&backend, tmp.path(), true);

        let second = MockBackend::new().with_image("logo.png", 90, 90);
        let report = run(&second, tmp.path(), false);
        assert_eq!(report.cache_stats.misses, 9);
        assert_eq!(second.outputs().len(), 9);
        assert!(cache::manifest_path(&tmp.path().join("images")).exists());
    }

    #[test]
    fn moved_image_is_copied_from_cache() {
        let tmp = setup(&["logo.png"]);
        let backend = MockBackend::new().with_image("logo.png", 90, 90);
        run(&backend, tmp.path(), true);

        let old = tmp.path().join("images/common/logo.png");
        write_file(tmp.path(), "images/common/brand/logo.png", &std::fs::read(&old).unwrap());
        std::fs::remove_file(old).unwrap();

        let second = MockBackend::new().with_image("logo.png", 90, 90);
        let report = run(&second, tmp.path(), true);
        assert_eq!(report.cache_stats.copies, 9);
        assert!(tmp.path().join("images/web/webp/brand/logo.webp").exists());

        let manifest = CacheManifest::load(&tmp.path().join("images"));
        assert!(manifest.entries.contains_key("web/webp/brand/logo.webp"));
        assert!(!manifest.entries.contains_key("web/webp/logo.webp"));
        assert_eq!(manifest.entries.len(), 9);
    }

    #[test]
    fn identical_sources_both_hit_cache_on_rerun() {
        let tmp = TempDir::new().unwrap();
        for rel in ["placeholder.png", "spare.png"] {
            write_file(tmp.path(), &format!("images/common/{rel}"), b"same bytes");
        }
        let images = |b: MockBackend| {
            b.with_image("placeholder.png", 90, 90)
                .with_image("spare.png", 90, 90)
        };
        run(&images(MockBackend::new()), tmp.path(), true);

        let second = images(MockBackend::new());
        let report = run(&second, tmp.path(), true);

        assert_eq!(report.cache_stats.hits, 18);
        assert_eq!(report.cache_stats.copies, 0);
        assert!(second.outputs().is_empty());
    }

    #[test]
    fn changed_quality_misses_cache() {
        let tmp = setup(&["logo.png"]);
        run(&MockBackend::new().with_image("logo.png", 90, 90), tmp.path(), true);

        let mut config = AssetsConfig::default();
        config.web.webp_quality = 60;
        let second = MockBackend::new().with_image("logo.png", 90, 90);
        let report =
            optimize_images_with_backend(&second, tmp.path(), &config, true, None).unwrap();

        assert_eq!(report.cache_stats.misses, 1);
        assert_eq!(report.cache_stats.hits, 8);
        assert!(matches!(
            &second.get_operations()[1],
            RecordedOp::Convert { output, .. } if output.ends_with("web/webp/logo.webp")
        ));
    }

    #[test]
    fn binding_collision_aborts_before_encoding() {
        let tmp = setup(&["a/logo.png", "b/logo.jpg"]);
        let backend = MockBackend::new()
            .with_image("logo.png", 10, 10)
            .with_image("logo.jpg", 10, 10);

        let result =
            optimize_images_with_backend(&backend, tmp.path(), &AssetsConfig::default(), true, None);

        assert!(matches!(result, Err(OptimizeError::Collision(c)) if c.identifier == "logo"));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn missing_source_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = optimize_images_with_backend(
            &MockBackend::new(),
            tmp.path(),
            &AssetsConfig::default(),
            true,
            None,
        );
        assert!(matches!(result, Err(OptimizeError::Scan(ScanError::MissingDirectory(_)))));
    }
}
