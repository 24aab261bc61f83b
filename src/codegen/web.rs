//! Web templates: React components, SVG sprite, CSS and ES module indexes.
//!
//! ## Files
//!
//! | Template | Written to |
//! |---|---|
//! | [`icon_component`] | `icons/web/<Pascal>.jsx` |
//! | [`sprite`] | `icons/web/sprite.svg` |
//! | [`icon_css`] | `icons/web/icons.css` |
//! | [`icon_index`] | `icons/web/index.js` |
//! | [`image_index`] | `images/web/index.js` |
//! | [`package_index`] | `index.js` |
//!
//! The sprite is rendered with Maud so symbol ids and viewBoxes are escaped;
//! symbol bodies are inserted pre-escaped because they are already markup.

use super::{banner, js_str};
use crate::config::{AssetsConfig, BrandConfig};
use crate::layout;
use crate::naming::css_class_suffix;
use crate::svg::SvgDocument;
use crate::types::{GeneratedIcon, OptimizedImage, ThumbnailSize};
use maud::{PreEscaped, html};
use regex::Regex;
use std::sync::LazyLock;

static FILL_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|\s)fill=("[^"]*"|'[^']*')"#).unwrap());

/// Rewrite every `fill="…"` attribute to the JSX expression `fill={color}`.
pub fn jsx_fill(markup: &str) -> String {
    FILL_ATTR.replace_all(markup, "${1}fill={color}").into_owned()
}

/// React function component wrapping one icon's shapes.
pub fn icon_component(component: &str, name: &str, doc: &SvgDocument, brand: &BrandConfig) -> String {
    let prefix = brand.css_prefix();
    let suffix = css_class_suffix(name);
    let shapes = jsx_fill(&doc.shapes.concat());
    let view_box = &doc.view_box;

    format!(
        r#"import React from 'react';

{banner}export function {component}({{
  size = 24,
  color = 'currentColor',
  className = '',
  ...props
}}) {{
  return (
    <svg
      width={{size}}
      height={{size}}
      viewBox="{view_box}"
      fill="none"
      xmlns="http://www.w3.org/2000/svg"
      className={{`{prefix} {prefix}-{suffix} ${{className}}`}}
      {{...props}}
    >
      {shapes}
    </svg>
  );
}}

{component}.displayName = '{component}';
"#,
        banner = banner(&format!("{component} Icon Component")),
    )
}

/// One `<symbol>` in the sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSymbol {
    pub id: String,
    pub view_box: String,
    pub inner: String,
}

/// Hidden SVG document holding one `<symbol>` per icon.
pub fn sprite(symbols: &[SpriteSymbol]) -> String {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" style="display: none;" {
            @for symbol in symbols {
                symbol id=(symbol.id) viewBox=(symbol.view_box) {
                    (PreEscaped(&symbol.inner))
                }
            }
        }
    }
    .into_string()
}

/// Base `.pickly-icon` rule plus one placeholder rule per icon class.
pub fn icon_css(icons: &[GeneratedIcon], brand: &BrandConfig) -> String {
    let prefix = brand.css_prefix();
    let mut out = banner(&format!("{} Icons - CSS Styles", brand.name));
    out.push_str(&format!(
        "\n.{prefix} {{\n  display: inline-block;\n  vertical-align: middle;\n  flex-shrink: 0;\n}}\n\n"
    ));
    for icon in icons {
        out.push_str(&format!(
            ".{prefix}-{} {{ /* Add custom styles for {} */ }}\n",
            css_class_suffix(&icon.name),
            icon.name
        ));
    }
    out
}

/// Re-exports every component plus URL helpers for individual SVGs and sprite symbols.
pub fn icon_index(icons: &[GeneratedIcon], config: &AssetsConfig) -> String {
    let web_url = icons_web_url(&config.web.base_url);
    let mut out = banner(&format!("{} Icons - Web Components", config.brand.name));
    out.push('\n');
    for icon in icons {
        out.push_str(&format!(
            "export {{ {0} }} from './{0}';\n",
            icon.component
        ));
    }
    out.push_str(&format!(
        r#"
// Icon utilities
export function getIconUrl(name) {{
  return `{web_url}/${{name}}.svg`;
}}

export function getSpriteIcon(name) {{
  return `{web_url}/{sprite}#${{name}}`;
}}
"#,
        sprite = layout::SPRITE_FILE,
    ));
    out
}

/// One `export const` per web image plus URL helpers.
pub fn image_index(images: &[OptimizedImage], config: &AssetsConfig) -> String {
    let base = &config.web.base_url;
    let sizes = config.web.thumbnail_sizes;
    let web_url = layout::web_image_url(base, "");
    let web_url = web_url.trim_end_matches('/');

    let exports: Vec<String> = images
        .iter()
        .filter(|image| image.web)
        .map(|image| {
            let key = image.key();
            let url = |rel: String| js_str(&layout::web_image_url(base, &rel));
            let thumbnails: Vec<String> = ThumbnailSize::ALL
                .iter()
                .map(|size| {
                    format!(
                        "    {}: '{}'",
                        size.as_str(),
                        url(layout::web_thumbnail(sizes[size.index()], &key))
                    )
                })
                .collect();
            format!(
                "export const {} = {{\n  webp: '{}',\n  png: '{}',\n  thumbnail: {{\n{}\n  }}\n}};",
                image.binding,
                url(layout::web_webp(&key)),
                url(layout::web_png(&key)),
                thumbnails.join(",\n")
            )
        })
        .collect();

    let mut out = banner(&format!("{} Images - Web Exports", config.brand.name));
    out.push('\n');
    if !exports.is_empty() {
        out.push_str(&exports.join("\n\n"));
        out.push_str("\n\n");
    }
    out.push_str(&format!(
        r#"// Image utilities
export function getImageUrl(name, format = 'webp') {{
  return `{web_url}/${{format}}/${{name}}.${{format}}`;
}}

{thumbnail_sizes}
export function getThumbnailUrl(name, size = 'medium') {{
  return `{web_url}/thumbnails/${{THUMBNAIL_SIZES[size]}}/${{name}}.webp`;
}}

export function getResponsiveImageSrcSet(name) {{
  return [
{srcset}
  ].join(', ');
}}
"#,
        thumbnail_sizes = thumbnail_sizes_const(sizes),
        srcset = srcset_entries(sizes),
    ));
    out
}

/// Package entry point: re-exports both web indexes and adds base-URL-aware helpers.
pub fn package_index(
    icons: &[GeneratedIcon],
    images: &[OptimizedImage],
    config: &AssetsConfig,
) -> String {
    let icon_names: Vec<String> = icons
        .iter()
        .map(|icon| format!("'{}'", js_str(&icon.name)))
        .collect();
    let image_names: Vec<String> = images
        .iter()
        .filter(|image| image.web)
        .map(|image| format!("'{}'", image.binding))
        .collect();
    let sizes = config.web.thumbnail_sizes;

    let mut out = banner(&format!("{} Assets - Web Entry Point", config.brand.name));
    out.push_str(&format!(
        r#"
// Icons
export * from './{icons}/{web}/{index}';

// Images
export * from './{images}/{web}/{index}';

// Asset utilities
export const ASSET_BASE_URL = process.env.{env} || '{base}';

export function getAssetUrl(path) {{
  return `${{ASSET_BASE_URL}}/${{path}}`;
}}

export function getImageUrl(name, format = 'webp') {{
  return getAssetUrl(`{images}/{web}/${{format}}/${{name}}.${{format}}`);
}}

export function getIconUrl(name) {{
  return getAssetUrl(`{icons}/{web}/${{name}}.svg`);
}}

{thumbnail_sizes}
export function getThumbnailUrl(name, size = 'medium') {{
  return getAssetUrl(`{images}/{web}/thumbnails/${{THUMBNAIL_SIZES[size]}}/${{name}}.webp`);
}}

export function getResponsiveImageSrcSet(name) {{
  return [
{srcset}
  ].join(', ');
}}

// Picture element helper
export function createPictureElement(name, alt = '', className = '') {{
  return `<picture class="${{className}}">` +
    `<source srcset="${{getImageUrl(name, 'webp')}}" type="image/webp">` +
    `<source srcset="${{getImageUrl(name, 'png')}}" type="image/png">` +
    `<img src="${{getImageUrl(name, 'png')}}" alt="${{alt}}" loading="lazy">` +
    `</picture>`;
}}

// Asset manifest for build tools
export const ASSET_MANIFEST = {{
  icons: [{icon_names}],
  images: [{image_names}],
  version: '{version}'
}};
"#,
        icons = layout::ICONS_DIR,
        images = layout::IMAGES_DIR,
        web = layout::WEB_DIR,
        index = layout::WEB_INDEX_FILE,
        env = config.web.base_url_env,
        base = js_str(config.web.base_url.trim_end_matches('/')),
        thumbnail_sizes = thumbnail_sizes_const(sizes),
        srcset = srcset_entries(sizes),
        icon_names = icon_names.join(", "),
        image_names = image_names.join(", "),
        version = js_str(&config.brand.version),
    ));
    out
}

fn icons_web_url(base_url: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        layout::ICONS_DIR,
        layout::WEB_DIR
    )
}

/// `const THUMBNAIL_SIZES = { small: '150x150', ... };`
fn thumbnail_sizes_const(sizes: [u32; 3]) -> String {
    let entries: Vec<String> = ThumbnailSize::ALL
        .iter()
        .map(|size| {
            format!(
                "  {}: '{}'",
                size.as_str(),
                layout::thumbnail_dir(sizes[size.index()])
            )
        })
        .collect();
    format!("const THUMBNAIL_SIZES = {{\n{}\n}};\n", entries.join(",\n"))
}

/// Body lines of the `srcset` array, widest last.
fn srcset_entries(sizes: [u32; 3]) -> String {
    ThumbnailSize::ALL
        .iter()
        .map(|size| {
            format!(
                "    `${{getThumbnailUrl(name, '{}')}} {}w`",
                size.as_str(),
                sizes[size.index()]
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}
