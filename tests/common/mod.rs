// Shared test helpers for xhtml-strict.
#![allow(dead_code)]

use xhtml_strict::{convert, ConversionResult, Options};

/// Convert with lenient auto-fix, panicking on a fatal error.
pub fn fix(html: &str) -> ConversionResult {
    convert(html.as_bytes(), &Options::fix())
        .unwrap_or_else(|err| panic!("fix failed for {html:?}: {err}"))
}

/// Convert with the given options, panicking on a fatal error.
pub fn convert_str(html: &str, options: &Options) -> String {
    convert(html.as_bytes(), options)
        .unwrap_or_else(|err| panic!("convert failed for {html:?}: {err}"))
        .output_str()
        .to_string()
}

/// The document html5ever builds around body content.
pub fn in_body(inner: &str) -> String {
    format!("<html><head></head><body>{inner}</body></html>")
}
