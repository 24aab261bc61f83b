//! SVG normalization and inspection for the icon stage.
//!
//! Icons go through two steps:
//!
//! 1. [`clean_svg`] collapses whitespace. The result is what gets written to
//!    `icons/web/<name>.svg` and what every later step reads.
//! 2. [`inspect_svg`] streams the cleaned markup with `quick-xml` and pulls out
//!    the pieces the templates need: the root `viewBox`, the raw inner markup
//!    (for sprite symbols), and the outer markup of every shape element (for
//!    the JSX wrapper).
//!
//! Markup is sliced from the source by byte position rather than re-serialized,
//! so attribute order, quoting and entity escapes survive untouched.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// `viewBox` used when the root element does not declare one.
pub const DEFAULT_VIEW_BOX: &str = "0 0 24 24";

/// Elements copied into the JSX wrapper.
pub const SHAPE_ELEMENTS: &[&str] = &["path", "circle", "rect", "line", "polyline", "polygon"];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

#[derive(Error, Debug, PartialEq)]
pub enum SvgError {
    #[error("No root <svg> element")]
    MissingRoot,
    #[error("Root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),
    #[error("Root <svg> element is never closed")]
    Unclosed,
    #[error("Malformed SVG at byte {position}: {message}")]
    Malformed { position: u64, message: String },
}

/// What the icon templates need from one cleaned SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    /// Root `viewBox`, or [`DEFAULT_VIEW_BOX`].
    pub view_box: String,
    /// Markup between the root start and end tags.
    pub inner: String,
    /// Outer markup of each outermost shape element, in document order.
    pub shapes: Vec<String>,
}

/// Collapse whitespace runs, drop whitespace between tags, trim.
pub fn clean_svg(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    BETWEEN_TAGS
        .replace_all(&collapsed, "><")
        .trim()
        .to_string()
}

/// Parse a cleaned SVG and extract its viewBox, inner markup and shapes.
///
/// Anything before the root element (XML declaration, doctype, comments) is
/// skipped. Shapes nested inside groups are collected; a shape nested inside
/// another shape is part of its parent's markup and is not listed twice.
pub fn inspect_svg(source: &str) -> Result<SvgDocument, SvgError> {
    let mut reader = Reader::from_str(source);
    let malformed = |reader: &Reader<&[u8]>, e: quick_xml::Error| SvgError::Malformed {
        position: position(reader) as u64,
        message: e.to_string(),
    };

    // Locate the root element.
    let (view_box, inner_start, self_closing) = loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                check_root(&e)?;
                break (view_box(&e), position(&reader), false);
            }
            Ok(Event::Empty(e)) => {
                check_root(&e)?;
                break (view_box(&e), position(&reader), true);
            }
            Ok(Event::Eof) => return Err(SvgError::MissingRoot),
            Ok(_) => {}
            Err(e) => return Err(malformed(&reader, e)),
        }
    };

    if self_closing {
        return Ok(SvgDocument {
            view_box,
            inner: String::new(),
            shapes: Vec::new(),
        });
    }

    let mut depth = 0usize;
    let mut shapes = Vec::new();
    // (start byte, depth) of the shape currently being captured
    let mut open_shape: Option<(usize, usize)> = None;

    loop {
        let before = position(&reader);
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                if open_shape.is_none() && is_shape(&e) {
                    open_shape = Some((before, depth));
                }
            }
            Ok(Event::Empty(e)) => {
                if open_shape.is_none() && is_shape(&e) {
                    shapes.push(source[before..position(&reader)].to_string());
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return Ok(SvgDocument {
                        view_box,
                        inner: source[inner_start..before].to_string(),
                        shapes,
                    });
                }
                if let Some((start, shape_depth)) = open_shape
                    && shape_depth == depth
                {
                    shapes.push(source[start..position(&reader)].to_string());
                    open_shape = None;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(SvgError::Unclosed),
            Ok(_) => {}
            Err(e) => return Err(malformed(&reader, e)),
        }
    }
}

fn position(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

fn check_root(e: &BytesStart) -> Result<(), SvgError> {
    let name = e.local_name();
    if name.as_ref() == b"svg" {
        Ok(())
    } else {
        Err(SvgError::UnexpectedRoot(
            String::from_utf8_lossy(name.as_ref()).to_string(),
        ))
    }
}

fn view_box(e: &BytesStart) -> String {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"viewBox")
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_VIEW_BOX.to_string())
}

fn is_shape(e: &BytesStart) -> bool {
    let name = e.local_name();
    SHAPE_ELEMENTS
        .iter()
        .any(|shape| shape.as_bytes() == name.as_ref())
}
