// Conversion outcome types: applied changes and the result value.

use std::fmt;

use crate::error::Error;
use crate::scan::{Defect, DefectKind};

/// Category of an applied change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    UnclosedTag,
    UnquotedAttribute,
    UppercaseTag,
    InvalidNesting,
    MissingNamespace,
}

impl ChangeKind {
    /// Every kind, in declaration order.
    pub const ALL: [ChangeKind; 5] = [
        ChangeKind::UnclosedTag,
        ChangeKind::UnquotedAttribute,
        ChangeKind::UppercaseTag,
        ChangeKind::InvalidNesting,
        ChangeKind::MissingNamespace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::UnclosedTag => "unclosed-tag",
            ChangeKind::UnquotedAttribute => "unquoted-attribute",
            ChangeKind::UppercaseTag => "uppercase-tag",
            ChangeKind::InvalidNesting => "invalid-nesting",
            ChangeKind::MissingNamespace => "missing-namespace",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute casing and quoting defects share one change kind.
impl From<DefectKind> for ChangeKind {
    fn from(kind: DefectKind) -> Self {
        match kind {
            DefectKind::UppercaseTag => ChangeKind::UppercaseTag,
            DefectKind::UppercaseAttribute | DefectKind::UnquotedAttribute => {
                ChangeKind::UnquotedAttribute
            }
            DefectKind::UnclosedVoidElement => ChangeKind::UnclosedTag,
        }
    }
}

/// One rewrite applied during auto-fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    /// DOM path such as `html>body>div[1]`, when the change came from the tree.
    pub location: Option<String>,
    pub message: String,
    pub original: String,
    pub fixed: String,
}

impl Change {
    pub fn new(
        kind: ChangeKind,
        message: impl Into<String>,
        original: impl Into<String>,
        fixed: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location: None,
            message: message.into(),
            original: original.into(),
            fixed: fixed.into(),
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl From<&Defect> for Change {
    fn from(defect: &Defect) -> Self {
        Change::new(
            defect.kind.into(),
            defect.message(),
            defect.original.clone(),
            defect.fixed.clone(),
        )
    }
}

/// Output of a completed conversion.
///
/// `success` is true exactly when no errors were recovered. The output byte
/// count always equals the output length.
#[derive(Debug)]
pub struct ConversionResult {
    success: bool,
    output: Vec<u8>,
    input_bytes: usize,
    changes: Vec<Change>,
    errors: Vec<Error>,
    warnings: Vec<String>,
}

impl ConversionResult {
    pub(crate) fn new(
        input_bytes: usize,
        output: Vec<u8>,
        changes: Vec<Change>,
        errors: Vec<Error>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: errors.is_empty(),
            output,
            input_bytes,
            changes,
            errors,
            warnings,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output as text. Serialized output is always UTF-8.
    pub fn output_str(&self) -> &str {
        std::str::from_utf8(&self.output).unwrap_or_default()
    }

    pub fn into_output(self) -> Vec<u8> {
        self.output
    }

    pub fn input_bytes(&self) -> usize {
        self.input_bytes
    }

    pub fn output_bytes(&self) -> usize {
        self.output.len()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Errors recovered in lenient mode.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defect_kinds_map_to_change_kinds() {
        assert_eq!(ChangeKind::from(DefectKind::UppercaseTag), ChangeKind::UppercaseTag);
        assert_eq!(
            ChangeKind::from(DefectKind::UppercaseAttribute),
            ChangeKind::UnquotedAttribute
        );
        assert_eq!(
            ChangeKind::from(DefectKind::UnquotedAttribute),
            ChangeKind::UnquotedAttribute
        );
        assert_eq!(
            ChangeKind::from(DefectKind::UnclosedVoidElement),
            ChangeKind::UnclosedTag
        );
    }

    #[test]
    fn test_success_tracks_recovered_errors() {
        let ok = ConversionResult::new(3, b"<p>".to_vec(), vec![], vec![], vec![]);
        assert!(ok.success());
        assert_eq!(ok.output_bytes(), 3);

        let recovered = Error::new(ErrorKind::ParseFailed, "bad bytes");
        let partial = ConversionResult::new(3, Vec::new(), vec![], vec![recovered], vec![]);
        assert!(!partial.success());
        assert_eq!(partial.output_bytes(), 0);
    }
}
