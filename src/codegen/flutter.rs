//! Flutter templates: icon registry and widgets, image constants, package library.

use super::{banner, dart_str};
use crate::config::AssetsConfig;
use crate::layout;
use crate::types::{Density, GeneratedIcon, OptimizedImage};

/// `icons/mobile/index.dart`: `PicklyIcons` registry plus one widget per icon.
///
/// Each icon gets an `IconData` constant at its assigned code point, a
/// `byName` entry keyed by the source name, and a `<Pascal>Icon` widget that
/// loads the density raster matching its logical size.
pub fn icon_registry(icons: &[GeneratedIcon], config: &AssetsConfig) -> String {
    let class = config.brand.icons_class();
    let fallback = config.icons.fallback_code_point;

    let constants: Vec<String> = icons
        .iter()
        .map(|icon| {
            format!(
                "  static const IconData {} = IconData({:#06x}, fontFamily: _family);",
                icon.field, icon.code_point
            )
        })
        .collect();
    let by_name: Vec<String> = icons
        .iter()
        .map(|icon| format!("    '{}': {},", dart_str(&icon.name), icon.field))
        .collect();

    let mut out = banner(&format!("{} Icons - Flutter Widgets", config.brand.name));
    out.push_str(&format!(
        r#"
import 'package:flutter/material.dart';

class {class} {{
  {class}._();

  static const String _family = '{class}';
  static const IconData _fallback = IconData({fallback:#06x}, fontFamily: _family);

{constants}
  static const Map<String, IconData> byName = {{
{by_name}
  }};

  /// Icon for a source file name, or the fallback glyph when unknown.
  static IconData of(String name) => byName[name] ?? _fallback;
}}
"#,
        constants = block(&constants),
        by_name = by_name.join("\n"),
    ));

    for widget in icons.iter().filter_map(icon_widget) {
        out.push('\n');
        out.push_str(&widget);
    }
    out
}

fn icon_widget(icon: &GeneratedIcon) -> Option<String> {
    let resolution = widget_resolution(&icon.rasters)?;
    let class = format!("{}Icon", icon.component);
    let asset = format!(
        "assets/{}/$resolution/{}.png",
        layout::ICONS_DIR,
        dart_str(&icon.name)
    );
    Some(format!(
        r#"class {class} extends StatelessWidget {{
  const {class}({{
    super.key,
    this.size = 24.0,
    this.color,
  }});

  final double size;
  final Color? color;

  @override
  Widget build(BuildContext context) {{
    final resolution = {resolution};
    return Image.asset(
      '{asset}',
      width: size,
      height: size,
      color: color,
    );
  }}
}}
"#
    ))
}

/// Dart expression choosing a density directory by logical size: 3x from
/// 48, 2x from 32, else 1x. Each tier falls back to the closest lower
/// density that exists, then to the lowest one that does.
fn widget_resolution(rasters: &[Density]) -> Option<String> {
    let pick = |wanted: Density| {
        rasters
            .iter()
            .copied()
            .filter(|d| *d <= wanted)
            .max()
            .or_else(|| rasters.iter().copied().min())
    };
    let large = pick(Density::X3)?;
    let medium = pick(Density::X2)?;
    let small = pick(Density::X1)?;
    if large == small {
        Some(format!("'{large}'"))
    } else {
        Some(format!(
            "size >= 48 ? '{large}' : size >= 32 ? '{medium}' : '{small}'"
        ))
    }
}

/// `images/mobile/index.dart`: `PicklyImages` constants and resolution helpers.
pub fn image_index(images: &[OptimizedImage], config: &AssetsConfig) -> String {
    let class = config.brand.images_class();
    let constants: Vec<String> = images
        .iter()
        .filter(|image| image.mobile)
        .map(|image| {
            format!(
                "  static const String {} = '{}';",
                image.constant,
                dart_str(&layout::mobile_asset_path(&image.key()))
            )
        })
        .collect();
    let assets = format!("assets/{}", layout::IMAGES_DIR);

    let mut out = banner(&format!("{} Images - Flutter Constants", config.brand.name));
    out.push_str(&format!(
        r#"
class {class} {{
  {class}._();

{constants}
  /// Density directory for a device pixel ratio.
  static String selectResolution(double pixelRatio) {{
    if (pixelRatio >= 3.0) return '3x';
    if (pixelRatio >= 2.0) return '2x';
    return '1x';
  }}

  /// Get image path for specific resolution
  static String getImage(String name, {{String resolution = '1x'}}) {{
    return '{assets}/$resolution/$name.png';
  }}

  /// Get compressed image path
  static String getCompressed(String name) {{
    return '{assets}/compressed/$name.jpg';
  }}

  /// Get responsive image based on device pixel ratio
  static String getResponsive(String name, double pixelRatio) {{
    return getImage(name, resolution: selectResolution(pixelRatio));
  }}
}}
"#,
        constants = block(&constants),
    ));
    out
}

/// `index.dart`: library declaration exporting both mobile indexes.
pub fn package_library(config: &AssetsConfig) -> String {
    let mut out = banner(&format!("{} Assets - Flutter Entry Point", config.brand.name));
    out.push_str(&format!(
        r#"
library {library};

// Icons
export '{icons}/{mobile}/{index}';

// Images
export '{images}/{mobile}/{index}';
"#,
        library = config.brand.dart_library(),
        icons = layout::ICONS_DIR,
        images = layout::IMAGES_DIR,
        mobile = layout::MOBILE_DIR,
        index = layout::MOBILE_INDEX_FILE,
    ));
    out
}

/// Member lines followed by a blank line, or nothing when empty.
fn block(lines: &[String]) -> String {
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", lines.join("\n"))
    }
}
