//! Generated source code for consumers of the asset package.
//!
//! Every template is a pure function from pipeline reports and config to a
//! `String`. Nothing here touches the filesystem; the stages decide where the
//! text goes.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`web`] | React icon components, sprite sheet, icon CSS, `index.js` files |
//! | [`flutter`] | `PicklyIcons` / `PicklyImages` registries, `index.dart` library |
//!
//! Given the same reports and config, every template returns byte-identical
//! output, so re-running the pipeline over an unchanged tree leaves the
//! generated code untouched.

pub mod flutter;
pub mod web;

/// Doc-comment banner at the top of every generated file.
pub(crate) fn banner(title: &str) -> String {
    format!("/**\n * {title}\n * Generated automatically - DO NOT EDIT\n */\n")
}

/// Escape text for a single-quoted JavaScript string literal.
pub(crate) fn js_str(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape text for a single-quoted Dart string literal.
///
/// Dart interpolates `$` inside normal strings, so it is escaped too.
pub(crate) fn dart_str(value: &str) -> String {
    js_str(value).replace('$', "\\$")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_format() {
        assert_eq!(
            banner("Pickly Icons - CSS Styles"),
            "/**\n * Pickly Icons - CSS Styles\n * Generated automatically - DO NOT EDIT\n */\n"
        );
    }

    #[test]
    fn js_str_escapes_quotes_and_backslashes() {
        assert_eq!(js_str("it's"), "it\\'s");
        assert_eq!(js_str(r"a\b"), r"a\\b");
    }

    #[test]
    fn dart_str_escapes_interpolation() {
        assert_eq!(dart_str("$price"), "\\$price");
        assert_eq!(dart_str("o'neil"), "o\\'neil");
    }
}
