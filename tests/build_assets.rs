//! End-to-end pipeline run with the real imaging backend.
//!
//! Builds a small asset package in a temp directory (two icons, two real
//! images and one corrupt file), runs all three stages and checks the
//! produced files and generated code.

use image::{ImageBuffer, Rgb};
use pickly_assets::config::AssetsConfig;
use pickly_assets::{icons, index, optimize};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <g>
    <path d="M3 12l9-9 9 9v9H3z" fill="#222"/>
  </g>
</svg>
"##;

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn write_jpeg(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(&path).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "icons/common/home.svg", ICON.as_bytes());
    write(root, "icons/common/bell-m.svg", ICON.as_bytes());
    write_jpeg(root, "images/common/hero/banner.jpg", 900, 600);
    write_jpeg(root, "images/common/logo.jpg", 120, 80);
    write(root, "images/common/broken.png", b"not an image");
    tmp
}

/// Run every stage and return the generated file contents that should be stable.
fn build(root: &Path, use_cache: bool) -> Vec<String> {
    let config = AssetsConfig::default();
    let icon_report = icons::generate_icons(root, &config, None).unwrap();
    let image_report = optimize::optimize_images(root, &config, use_cache, None).unwrap();
    let mut written = index::write_image_indexes(root, &image_report.images, &config).unwrap();
    written.extend(
        index::write_package_indexes(root, &icon_report.icons, &image_report.images, &config)
            .unwrap(),
    );
    written.extend(icon_report.written);
    written
        .iter()
        .map(|path| fs::read_to_string(path).unwrap())
        .collect()
}

#[test]
fn icons_produce_components_sprite_and_rasters() {
    let tmp = setup();
    let root = tmp.path();
    let report = icons::generate_icons(root, &AssetsConfig::default(), None).unwrap();

    let summary: Vec<_> = report
        .icons
        .iter()
        .map(|i| (i.component.as_str(), i.code_point, i.rasters.len()))
        .collect();
    assert_eq!(summary, vec![("BellM", 0xe000, 3), ("Home", 0xe001, 3)]);

    let jsx = read(root, "icons/web/BellM.jsx");
    assert!(jsx.contains("export function BellM("));
    assert!(jsx.contains(r#"<path d="M3 12l9-9 9 9v9H3z" fill={color}/>"#));

    let sprite = read(root, "icons/web/sprite.svg");
    assert!(sprite.contains(r#"<symbol id="bell-m" viewBox="0 0 24 24"><g><path"#));
    assert!(sprite.contains(r#"<symbol id="home" viewBox="0 0 24 24">"#));

    for (dir, size) in [("1x", 24), ("2x", 48), ("3x", 72)] {
        let png = image::open(root.join(format!("icons/mobile/{dir}/home.png"))).unwrap();
        assert_eq!((png.width(), png.height()), (size, size), "{dir}");
    }

    let dart = read(root, "icons/mobile/index.dart");
    assert!(dart.contains("static const IconData bellM = IconData(0xe000, fontFamily: _family);"));
    assert!(dart.contains("static const IconData home = IconData(0xe001, fontFamily: _family);"));
}

#[test]
fn images_produce_every_variant() {
    let tmp = setup();
    let root = tmp.path();
    let report = optimize::optimize_images(root, &AssetsConfig::default(), true, None).unwrap();

    assert_eq!(report.skipped, 1);
    let keys: Vec<_> = report.images.iter().map(|i| i.key()).collect();
    assert_eq!(keys, vec!["hero/banner", "logo"]);

    for rel in [
        "images/web/webp/hero/banner.webp",
        "images/web/png/hero/banner.png",
        "images/web/thumbnails/150x150/hero/banner.webp",
        "images/web/thumbnails/300x300/hero/banner.webp",
        "images/web/thumbnails/600x600/hero/banner.webp",
        "images/mobile/compressed/hero/banner.jpg",
    ] {
        assert!(root.join(rel).is_file(), "{rel}");
    }

    let thumb = image::open(root.join("images/web/thumbnails/300x300/hero/banner.webp")).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (300, 300));

    for (dir, dims) in [("1x", (300, 200)), ("2x", (600, 400)), ("3x", (900, 600))] {
        let png = image::open(root.join(format!("images/mobile/{dir}/hero/banner.png"))).unwrap();
        assert_eq!((png.width(), png.height()), dims, "{dir}");
    }
}

#[test]
fn indexes_reference_only_produced_assets() {
    let tmp = setup();
    let root = tmp.path();
    build(root, true);

    let web = read(root, "images/web/index.js");
    assert!(web.contains("export const banner = {"));
    assert!(web.contains("medium: '/assets/images/web/thumbnails/300x300/hero/banner.webp'"));
    assert!(web.contains("export const logo = {"));
    assert!(!web.contains("broken"));

    let mobile = read(root, "images/mobile/index.dart");
    assert!(mobile.contains("static const String BANNER = 'assets/images/hero/banner';"));
    assert!(!mobile.contains("BROKEN"));

    let package = read(root, "index.js");
    assert!(package.contains("icons: ['bell-m', 'home'],\n  images: ['banner', 'logo'],"));
    assert!(read(root, "index.dart").contains("library pickly_assets;"));
}

#[test]
fn rerun_is_cached_and_byte_identical() {
    let tmp = setup();
    let root = tmp.path();
    let first = build(root, true);

    let report = optimize::optimize_images(root, &AssetsConfig::default(), true, None).unwrap();
    assert_eq!(report.cache_stats.misses, 0);
    assert_eq!(report.cache_stats.hits, 18);

    let second = build(root, true);
    assert_eq!(first, second);
}

#[test]
fn user_config_overrides_generated_code() {
    let tmp = setup();
    let root = tmp.path();
    write(
        root,
        "assets.toml",
        b"[brand]\nname = \"Acme\"\n\n[web]\nbase_url = \"https://cdn.example.com\"\n",
    );
    let config = pickly_assets::config::load_config(root).unwrap();

    let icon_report = icons::generate_icons(root, &config, None).unwrap();
    assert_eq!(icon_report.icons.len(), 2);
    assert!(read(root, "icons/mobile/index.dart").contains("class AcmeIcons {"));
    assert!(read(root, "icons/web/icons.css").contains(".acme-icon {"));

    let image_report = optimize::optimize_images(root, &config, false, None).unwrap();
    index::write_image_indexes(root, &image_report.images, &config).unwrap();
    assert!(
        read(root, "images/web/index.js")
            .contains("webp: 'https://cdn.example.com/images/web/webp/logo.webp'")
    );
}
