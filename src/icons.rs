//! Icon generation.
//!
//! Stage 1 of the asset pipeline. Turns every `icons/common/*.svg` into web
//! and mobile outputs.
//!
//! ## Per icon
//!
//! - `icons/web/<name>.svg`: whitespace-cleaned copy of the source
//! - `icons/web/<Pascal>.jsx`: React component wrapping the icon's shapes
//! - `icons/mobile/{1x,2x,3x}/<name>.png`: square rasters (24/48/72 px by default)
//!
//! ## Per run
//!
//! - `icons/web/sprite.svg`: one `<symbol>` per icon
//! - `icons/web/index.js`, `icons/web/icons.css`
//! - `icons/mobile/index.dart`: `PicklyIcons` registry and widgets
//!
//! ## Failure handling
//!
//! Identifier collisions abort the stage before anything is written. An
//! unreadable or malformed SVG is skipped with a warning. A failed raster is
//! reported but the icon stays in every registry, since its web outputs and
//! code point exist. Its Flutter widget only loads the densities produced.
//!
//! Code points are assigned after all icons are processed, counting up from
//! `icons.code_point_base` over the generated icons in file name order.

use crate::codegen::{flutter, web};
use crate::config::AssetsConfig;
use crate::imaging::{ImageBackend, RustBackend, plan_icon_rasters};
use crate::layout;
use crate::naming::{self, Collision};
use crate::output::{PipelineEvent, send};
use crate::scan::{self, ScanError, SourceAsset};
use crate::svg::{self, SvgDocument};
use crate::types::{Density, GeneratedIcon};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Icon name collision: {0}")]
    Collision(Collision),
}

/// What stage 1 produced.
#[derive(Debug, Clone, PartialEq)]
pub struct IconReport {
    /// Generated icons in enumeration order, code points assigned.
    pub icons: Vec<GeneratedIcon>,
    /// Sources skipped because of input errors.
    pub skipped: usize,
    /// Per-run files written (sprite, indexes, stylesheet).
    pub written: Vec<PathBuf>,
}

/// An icon whose web outputs were written, before code point assignment.
struct ProcessedIcon {
    name: String,
    component: String,
    field: String,
    doc: SvgDocument,
    rasters: Vec<Density>,
}

/// Run stage 1 with the production backend.
pub fn generate_icons(
    root: &Path,
    config: &AssetsConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<IconReport, IconError> {
    generate_icons_with_backend(&RustBackend::new(), root, config, events)
}

/// Run stage 1 with any backend. Tests pass a mock.
pub fn generate_icons_with_backend(
    backend: &impl ImageBackend,
    root: &Path,
    config: &AssetsConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<IconReport, IconError> {
    let sources = scan::scan_icons(&layout::icon_source_dir(root))?;
    check_collisions(&sources)?;

    let web_dir = layout::icon_web_dir(root);
    let mobile_dir = layout::icon_mobile_dir(root);
    fs::create_dir_all(&web_dir)?;
    for density in Density::ALL {
        fs::create_dir_all(mobile_dir.join(density.as_str()))?;
    }

    let icons_dir = root.join(layout::ICONS_DIR);
    let results: Vec<Option<ProcessedIcon>> = sources
        .par_iter()
        .enumerate()
        .map(|(i, source)| {
            let processed = process_icon(backend, source, &icons_dir, config, &events);
            if let Some(icon) = &processed {
                send(
                    &events,
                    PipelineEvent::IconGenerated {
                        position: i + 1,
                        component: icon.component.clone(),
                        source: source.relative.clone(),
                        rasters: icon.rasters.clone(),
                    },
                );
            }
            processed
        })
        .collect();

    let skipped = results.iter().filter(|r| r.is_none()).count();
    let processed: Vec<ProcessedIcon> = results.into_iter().flatten().collect();
    let icons = assign_code_points(&processed, config.icons.code_point_base);

    let symbols: Vec<web::SpriteSymbol> = processed
        .iter()
        .map(|icon| web::SpriteSymbol {
            id: icon.name.clone(),
            view_box: icon.doc.view_box.clone(),
            inner: icon.doc.inner.clone(),
        })
        .collect();

    let outputs = [
        (web_dir.join(layout::SPRITE_FILE), web::sprite(&symbols) + "\n"),
        (web_dir.join(layout::WEB_INDEX_FILE), web::icon_index(&icons, config)),
        (web_dir.join(layout::ICON_CSS_FILE), web::icon_css(&icons, &config.brand)),
        (
            mobile_dir.join(layout::MOBILE_INDEX_FILE),
            flutter::icon_registry(&icons, config),
        ),
    ];
    let mut written = Vec::new();
    for (path, content) in outputs {
        fs::write(&path, content)?;
        written.push(path);
    }

    Ok(IconReport {
        icons,
        skipped,
        written,
    })
}

/// Reject source sets where two names derive the same component, Flutter
/// field or CSS class.
fn check_collisions(sources: &[SourceAsset]) -> Result<(), IconError> {
    let derivations: [fn(&str) -> String; 3] = [
        naming::pascal_case,
        naming::dart_field_name,
        naming::css_class_suffix,
    ];
    for derive in derivations {
        let idents: Vec<(&str, String)> = sources
            .iter()
            .map(|s| (s.relative.as_str(), derive(&s.base_name)))
            .filter(|(_, ident)| !ident.is_empty())
            .collect();
        if let Some(collision) =
            naming::find_collision(idents.iter().map(|(name, ident)| (*name, ident.as_str())))
        {
            return Err(IconError::Collision(collision));
        }
    }
    Ok(())
}

/// Write the web outputs and rasters of one icon.
///
/// Returns `None` (after a warning) when the icon has to be skipped.
fn process_icon(
    backend: &impl ImageBackend,
    source: &SourceAsset,
    icons_dir: &Path,
    config: &AssetsConfig,
    events: &Option<Sender<PipelineEvent>>,
) -> Option<ProcessedIcon> {
    let asset = display_path(source);
    let warn = |variant: Option<String>, message: String| {
        send(
            events,
            PipelineEvent::Warning {
                asset: asset.clone(),
                variant,
                message,
            },
        )
    };

    let name = source.base_name.clone();
    let component = naming::pascal_case(&name);
    if component.is_empty() {
        warn(None, format!("'{name}' does not produce a component name"));
        return None;
    }

    let (cleaned, doc) = match read_icon(&source.path) {
        Ok(read) => read,
        Err(message) => {
            warn(None, message);
            return None;
        }
    };

    let web_outputs = [
        (layout::icon_web_svg(&name), cleaned),
        (
            layout::icon_component_file(&component),
            web::icon_component(&component, &name, &doc, &config.brand),
        ),
    ];
    for (relative, content) in web_outputs {
        if let Err(e) = fs::write(layout::resolve(icons_dir, &relative), content) {
            warn(None, format!("Failed to write {relative}: {e}"));
            return None;
        }
    }

    let mut rasters = Vec::new();
    for (density, params) in
        plan_icon_rasters(&source.path, &name, icons_dir, config.icons.raster_sizes)
    {
        match backend.rasterize(&params) {
            Ok(()) => rasters.push(density),
            Err(e) => warn(Some(density.to_string()), e.to_string()),
        }
    }

    Some(ProcessedIcon {
        field: naming::dart_field_name(&name),
        name,
        component,
        doc,
        rasters,
    })
}

/// Read, clean and inspect one SVG. Errors are printable messages.
fn read_icon(path: &Path) -> Result<(String, SvgDocument), String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("Failed to read: {e}"))?;
    let cleaned = svg::clean_svg(&raw);
    let doc = svg::inspect_svg(&cleaned).map_err(|e| e.to_string())?;
    Ok((cleaned, doc))
}

fn assign_code_points(processed: &[ProcessedIcon], base: u32) -> Vec<GeneratedIcon> {
    processed
        .iter()
        .zip(base..)
        .map(|(icon, code_point)| GeneratedIcon {
            name: icon.name.clone(),
            component: icon.component.clone(),
            field: icon.field.clone(),
            code_point,
            rasters: icon.rasters.clone(),
        })
        .collect()
}

fn display_path(source: &SourceAsset) -> String {
    format!(
        "{}/{}/{}",
        layout::ICONS_DIR,
        layout::SOURCE_DIR,
        source.relative
    )
}
