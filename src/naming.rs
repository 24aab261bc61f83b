//! Identifier derivation from source file names.
//!
//! Every generated name is a pure function of the source base name, so the
//! same inputs always produce byte-identical index files.
//!
//! | Use | Rule | `bell-m` | `hero banner` |
//! |---|---|---|---|
//! | Web component | PascalCase on `-`/`_` | `BellM` | |
//! | CSS class suffix | component, lower-cased | `bellm` | |
//! | Flutter icon field | component, first letter lowered | `bellM` | |
//! | Web image binding | `-`/whitespace → `_`, keep `[A-Za-z0-9_]` | | `hero_banner` |
//! | Mobile image constant | upper-case, then the binding rule | | `HERO_BANNER` |
//!
//! Only ASCII letters and digits survive. Identifiers that would start with
//! a digit get a leading `_`, and identifiers that equal a JS or Dart keyword,
//! or a name the generated code already declares, get a trailing `_`:
//! `delete` → `delete_`, `switch` → `switch_`, `by-name` → `byName_`.
//!
//! ## Collisions
//!
//! Two source names can normalize to the same identifier (`bell-m` and
//! `bell_m` both become `BellM`). [`find_collision`] detects this so stages
//! can refuse to run instead of letting one manifest entry overwrite another.

use std::collections::HashMap;
use std::fmt;

/// PascalCase component name: split on `-`, `_` and whitespace, keep ASCII
/// letters and digits, capitalize the first letter of each word and
/// lower-case the rest.
///
/// - `"home"` → `"Home"`
/// - `"bell-m"` → `"BellM"`
/// - `"arrow_LEFT"` → `"ArrowLeft"`
/// - `"arrow.left"` → `"Arrowleft"`
pub fn pascal_case(name: &str) -> String {
    let joined: String = name
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .map(|word| {
            let word: String = word.chars().filter(char::is_ascii_alphanumeric).collect();
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();
    guard_leading_digit(joined)
}

/// CSS class suffix for an icon: the component name, lower-cased.
pub fn css_class_suffix(name: &str) -> String {
    pascal_case(name).to_lowercase()
}

/// Flutter field name for an icon: the component name with its first letter
/// lowered, escaped against Dart keywords and the registry's own members.
pub fn dart_field_name(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    let field = match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => return String::new(),
    };
    escape_reserved(field, DART_RESERVED)
}

/// Web image binding: dashes and whitespace become underscores, anything
/// outside `[A-Za-z0-9_]` is dropped.
///
/// Returns `None` when nothing usable remains.
pub fn js_binding(base_name: &str) -> Option<String> {
    non_empty(guard_leading_digit(sanitize(base_name))).map(|b| escape_reserved(b, JS_RESERVED))
}

/// Mobile image constant: upper-case first, then the binding rule.
pub fn dart_constant(base_name: &str) -> Option<String> {
    non_empty(guard_leading_digit(sanitize(&base_name.to_uppercase())))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn guard_leading_digit(ident: String) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// JS keywords plus every name declared by the generated web indexes.
const JS_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
    // generated helpers
    "ASSET_BASE_URL", "ASSET_MANIFEST", "THUMBNAIL_SIZES", "createPictureElement",
    "getAssetUrl", "getIconUrl", "getImageUrl", "getResponsiveImageSrcSet", "getSpriteIcon",
    "getThumbnailUrl",
];

/// Dart keywords and built-in identifiers, `Object` members a static field
/// may not shadow, and the members of the generated icon registry.
const DART_RESERVED: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "base", "break", "case", "catch", "class",
    "const", "continue", "covariant", "default", "deferred", "do", "dynamic", "else", "enum",
    "export", "extends", "extension", "external", "factory", "false", "final", "finally", "for",
    "get", "hide", "if", "implements", "import", "in", "interface", "is", "late", "library",
    "mixin", "new", "null", "of", "on", "operator", "part", "required", "rethrow", "return",
    "sealed", "set", "show", "static", "super", "switch", "sync", "this", "throw", "true", "try",
    "type", "typedef", "var", "void", "when", "while", "with", "yield",
    "hashCode", "noSuchMethod", "runtimeType", "toString",
    "byName",
];

fn escape_reserved(ident: String, reserved: &[&str]) -> String {
    if reserved.contains(&ident.as_str()) {
        ident + "_"
    } else {
        ident
    }
}

fn non_empty(ident: String) -> Option<String> {
    if ident.is_empty() { None } else { Some(ident) }
}

/// Two distinct sources that derive the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub identifier: String,
    pub first: String,
    pub second: String,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' and '{}' both map to identifier '{}'",
            self.first, self.second, self.identifier
        )
    }
}

/// Return the first identifier shared by two different sources.
///
/// Items are `(source, identifier)` pairs in enumeration order.
pub fn find_collision<'a, I>(items: I) -> Option<Collision>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (source, ident) in items {
        if let Some(first) = seen.insert(ident, source)
            && first != source
        {
            return Some(Collision {
                identifier: ident.to_string(),
                first: first.to_string(),
                second: source.to_string(),
            });
        }
    }
    None
}
