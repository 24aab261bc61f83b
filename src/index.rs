//! Index generation.
//!
//! Stage 3 of the asset pipeline. Writes the per-platform image indexes and
//! the package entry points from the reports of stages 1 and 2. Nothing is
//! read back from disk, so an asset that failed earlier in the run is never
//! referenced.
//!
//! | File | Written by |
//! |---|---|
//! | `images/web/index.js` | [`write_image_indexes`] |
//! | `images/mobile/index.dart` | [`write_image_indexes`] |
//! | `index.js` | [`write_package_indexes`] |
//! | `index.dart` | [`write_package_indexes`] |

use crate::codegen::{flutter, web};
use crate::config::AssetsConfig;
use crate::layout;
use crate::types::{GeneratedIcon, OptimizedImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `images/web/index.js` and `images/mobile/index.dart`.
pub fn write_image_indexes(
    root: &Path,
    images: &[OptimizedImage],
    config: &AssetsConfig,
) -> Result<Vec<PathBuf>, IndexError> {
    write_all([
        (
            layout::image_web_dir(root).join(layout::WEB_INDEX_FILE),
            web::image_index(images, config),
        ),
        (
            layout::image_mobile_dir(root).join(layout::MOBILE_INDEX_FILE),
            flutter::image_index(images, config),
        ),
    ])
}

/// Write the package-level `index.js` and `index.dart`.
pub fn write_package_indexes(
    root: &Path,
    icons: &[GeneratedIcon],
    images: &[OptimizedImage],
    config: &AssetsConfig,
) -> Result<Vec<PathBuf>, IndexError> {
    write_all([
        (
            root.join(layout::WEB_INDEX_FILE),
            web::package_index(icons, images, config),
        ),
        (
            root.join(layout::MOBILE_INDEX_FILE),
            flutter::package_library(config),
        ),
    ])
}

fn write_all<const N: usize>(files: [(PathBuf, String); N]) -> Result<Vec<PathBuf>, IndexError> {
    let mut written = Vec::with_capacity(N);
    for (path, content) in files {
        let result = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::write(&path, content));
        if let Err(source) = result {
            return Err(IndexError::Write { path, source });
        }
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn image(base: &str, web: bool, mobile: bool) -> OptimizedImage {
        OptimizedImage {
            subdir: String::new(),
            base_name: base.to_string(),
            binding: base.to_string(),
            constant: base.to_uppercase(),
            dimensions: (10, 10),
            web,
            mobile,
        }
    }

    #[test]
    fn image_indexes_follow_platform_flags() {
        let tmp = TempDir::new().unwrap();
        let images = [image("logo", true, false), image("hero", false, true)];

        let written =
            write_image_indexes(tmp.path(), &images, &AssetsConfig::default()).unwrap();
        assert_eq!(
            written,
            vec![
                tmp.path().join("images/web/index.js"),
                tmp.path().join("images/mobile/index.dart"),
            ]
        );

        let js = std::fs::read_to_string(&written[0]).unwrap();
        assert!(js.contains("export const logo = {"));
        assert!(!js.contains("export const hero"));

        let dart = std::fs::read_to_string(&written[1]).unwrap();
        assert!(dart.contains("static const String HERO = 'assets/images/hero';"));
        assert!(!dart.contains("LOGO"));
    }

    #[test]
    fn package_indexes_are_written_at_root() {
        let tmp = TempDir::new().unwrap();
        let written =
            write_package_indexes(tmp.path(), &[], &[], &AssetsConfig::default()).unwrap();

        assert_eq!(
            written,
            vec![tmp.path().join("index.js"), tmp.path().join("index.dart")]
        );
        let js = std::fs::read_to_string(tmp.path().join("index.js")).unwrap();
        assert!(js.contains("icons: [],\n  images: [],"));
    }

    #[test]
    fn rerun_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let images = [image("logo", true, true)];
        let config = AssetsConfig::default();

        write_image_indexes(tmp.path(), &images, &config).unwrap();
        let first = std::fs::read(tmp.path().join("images/web/index.js")).unwrap();
        write_image_indexes(tmp.path(), &images, &config).unwrap();
        let second = std::fs::read(tmp.path().join("images/web/index.js")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unwritable_target_reports_path() {
        let tmp = TempDir::new().unwrap();
        // A file where the images directory should be.
        std::fs::write(tmp.path().join("images"), "").unwrap();

        let result = write_image_indexes(tmp.path(), &[], &AssetsConfig::default());
        assert!(matches!(
            result,
            Err(IndexError::Write { path, .. }) if path.ends_with("images/web/index.js")
        ));
    }
}
