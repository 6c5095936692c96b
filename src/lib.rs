// xhtml-strict: HTML to XHTML-strict conformance checker and rewriter.
//
// Architecture:
//   bytes → scan (text defects) → html5ever parse → owned tree
//         → validate | normalize → canonical serialize → bytes + changes
//
// The scan runs on raw text because the HTML5 parser repairs casing, quoting
// and void-element syntax before a tree exists. Metrics and cancellation are
// explicit objects passed in by the caller.

pub mod cancel;
mod convert;
pub mod dom;
mod error;
pub mod metrics;
pub mod parser;
mod result;
pub mod scan;
pub mod serialize;
pub mod tree;

pub use cancel::{CancelReason, CancelSignal, CancelToken, Checkpoint};
pub use convert::Converter;
pub use error::{BoxError, Error, ErrorKind, ParseError, Result};
pub use metrics::{ConversionMetrics, ConversionStats, Metrics, NoopMetrics};
pub use result::{Change, ChangeKind, ConversionResult};

/// Conversion options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Fail on the first violation instead of recording it.
    pub strict_mode: bool,
    /// Rewrite the document instead of only checking it.
    pub auto_fix: bool,
    /// Reserved; serialization is currently always canonical.
    pub preserve_formatting: bool,
    /// Ask the caller to validate rather than convert. The converter itself
    /// ignores this flag.
    pub validate_only: bool,
}

impl Options {
    /// Lenient, check-only options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail fast on any defect.
    pub fn strict() -> Self {
        Self::new().with_strict_mode(true)
    }

    /// Lenient auto-fix.
    pub fn fix() -> Self {
        Self::new().with_auto_fix(true)
    }

    /// Set whether violations abort the conversion.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Set whether the document is rewritten.
    pub fn with_auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    /// Set the reserved formatting flag.
    pub fn with_preserve_formatting(mut self, preserve: bool) -> Self {
        self.preserve_formatting = preserve;
        self
    }

    /// Set the validate-only flag.
    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }
}

/// Convert HTML bytes with a default converter (no metrics).
///
/// # Examples
///
/// ```
/// let result = xhtml_strict::convert(b"<BR>", &xhtml_strict::Options::fix()).unwrap();
/// assert_eq!(result.output_str(), "<html><head></head><body><br /></body></html>");
/// ```
pub fn convert(input: &[u8], options: &Options) -> Result<ConversionResult> {
    Converter::new().convert(input, options)
}

/// Validate HTML bytes with a default converter.
///
/// # Examples
///
/// ```
/// assert!(xhtml_strict::validate(b"<p>ok</p><br />").is_ok());
/// assert!(xhtml_strict::validate(b"<P>shout</P>").is_err());
/// ```
pub fn validate(input: &[u8]) -> Result<()> {
    Converter::new().validate(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_empty() {
        let result = convert(b"", &Options::fix()).unwrap();
        assert_eq!(result.output_str(), "<html><head></head><body></body></html>");
        assert!(result.success());
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .with_strict_mode(true)
            .with_auto_fix(true)
            .with_preserve_formatting(true)
            .with_validate_only(true);
        assert!(options.strict_mode);
        assert!(options.auto_fix);
        assert!(options.preserve_formatting);
        assert!(options.validate_only);
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert!(!options.strict_mode);
        assert!(!options.auto_fix);
        assert_eq!(Options::strict(), Options::new().with_strict_mode(true));
        assert_eq!(Options::fix(), Options::new().with_auto_fix(true));
    }

    #[test]
    fn test_preserve_formatting_has_no_effect() {
        let input = b"<p>a  b</p>\n<p>c</p>";
        let plain = convert(input, &Options::fix()).unwrap();
        let preserved = convert(input, &Options::fix().with_preserve_formatting(true)).unwrap();
        assert_eq!(plain.output(), preserved.output());
    }
}
