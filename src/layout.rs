//! Output directory layout.
//!
//! Every file the pipeline writes and every URL the generated index code
//! exposes is derived from the functions here, so the two cannot drift
//! apart. Relative paths always use `/` regardless of host platform.
//!
//! ```text
//! <root>/
//! ├── icons/
//! │   ├── common/*.svg                 # source
//! │   ├── web/<name>.svg, <Pascal>.jsx, sprite.svg, index.js, icons.css
//! │   └── mobile/{1x,2x,3x}/<name>.png, index.dart
//! ├── images/
//! │   ├── common/**                    # source
//! │   ├── web/
//! │   │   ├── webp/<sub>/<base>.webp
//! │   │   ├── png/<sub>/<base>.png
//! │   │   ├── thumbnails/{150x150,300x300,600x600}/<sub>/<base>.webp
//! │   │   └── index.js
//! │   └── mobile/
//! │       ├── compressed/<sub>/<base>.jpg
//! │       ├── {1x,2x,3x}/<sub>/<base>.png
//! │       └── index.dart
//! ├── index.js
//! └── index.dart
//! ```

use crate::types::Density;
use std::path::{Path, PathBuf};

pub const ICONS_DIR: &str = "icons";
pub const IMAGES_DIR: &str = "images";
pub const SOURCE_DIR: &str = "common";
pub const WEB_DIR: &str = "web";
pub const MOBILE_DIR: &str = "mobile";

pub const SPRITE_FILE: &str = "sprite.svg";
pub const ICON_CSS_FILE: &str = "icons.css";
pub const WEB_INDEX_FILE: &str = "index.js";
pub const MOBILE_INDEX_FILE: &str = "index.dart";

pub fn icon_source_dir(root: &Path) -> PathBuf {
    root.join(ICONS_DIR).join(SOURCE_DIR)
}

pub fn icon_web_dir(root: &Path) -> PathBuf {
    root.join(ICONS_DIR).join(WEB_DIR)
}

pub fn icon_mobile_dir(root: &Path) -> PathBuf {
    root.join(ICONS_DIR).join(MOBILE_DIR)
}

pub fn image_source_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR).join(SOURCE_DIR)
}

pub fn image_web_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR).join(WEB_DIR)
}

pub fn image_mobile_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR).join(MOBILE_DIR)
}

/// `<subdir>/<base>`, or just `<base>` when the asset sits at the source root.
pub fn asset_key(subdir: &str, base: &str) -> String {
    if subdir.is_empty() {
        base.to_string()
    } else {
        format!("{subdir}/{base}")
    }
}

// Paths below are relative to `images/web/`.

pub fn web_webp(key: &str) -> String {
    format!("webp/{key}.webp")
}

pub fn web_png(key: &str) -> String {
    format!("png/{key}.png")
}

pub fn web_thumbnail(size: u32, key: &str) -> String {
    format!("thumbnails/{}/{key}.webp", thumbnail_dir(size))
}

/// `150` → `150x150`
pub fn thumbnail_dir(size: u32) -> String {
    format!("{size}x{size}")
}

// Paths below are relative to `images/mobile/`.

pub fn mobile_compressed(key: &str) -> String {
    format!("compressed/{key}.jpg")
}

pub fn mobile_density(density: Density, key: &str) -> String {
    format!("{}/{key}.png", density.as_str())
}

// Paths below are relative to `icons/`.

pub fn icon_web_svg(name: &str) -> String {
    format!("{WEB_DIR}/{name}.svg")
}

pub fn icon_component_file(component: &str) -> String {
    format!("{WEB_DIR}/{component}.jsx")
}

pub fn icon_raster(density: Density, name: &str) -> String {
    format!("{MOBILE_DIR}/{}/{name}.png", density.as_str())
}

/// Join a `/`-separated relative path onto a filesystem directory.
pub fn resolve(dir: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(dir.to_path_buf(), |acc, part| acc.join(part))
}

/// Absolute URL of an image web variant under the serving base URL.
pub fn web_image_url(base_url: &str, relative: &str) -> String {
    format!(
        "{}/{IMAGES_DIR}/{WEB_DIR}/{relative}",
        base_url.trim_end_matches('/')
    )
}

/// Flutter asset path of an image, without density or extension.
pub fn mobile_asset_path(key: &str) -> String {
    format!("assets/{IMAGES_DIR}/{key}")
}
