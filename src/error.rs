// Structured error type shared by every conversion phase.
//
// One struct carries a kind from a closed taxonomy, a message, an optional
// wrapped cause and free-form context. Nothing else crosses the converter
// boundary.

use std::collections::BTreeMap;
use std::fmt;

/// Boxed cause carried by [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for converter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// The delegate parser rejected the input.
    ParseFailed,
    /// A textual or structural XHTML-strict rule was violated.
    ValidationFailed,
    /// The serializer could not write to its sink.
    ConversionFailed,
    /// A time-based cancellation signal expired.
    Timeout,
    /// A cancellation signal was triggered explicitly.
    Canceled,
    /// Malformed call arguments.
    InvalidInput,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::ParseFailed,
        ErrorKind::ValidationFailed,
        ErrorKind::ConversionFailed,
        ErrorKind::Timeout,
        ErrorKind::Canceled,
        ErrorKind::InvalidInput,
    ];

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ParseFailed => "parse-failed",
            ErrorKind::ValidationFailed => "validation-failed",
            ErrorKind::ConversionFailed => "conversion-failed",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Canceled => "canceled",
            ErrorKind::InvalidInput => "invalid-input",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the converter.
#[derive(Debug, thiserror::Error)]
#[error("[{kind}] {message}{}", cause_suffix(.source))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
    field: Option<String>,
    context: BTreeMap<String, String>,
}

fn cause_suffix(source: &Option<BoxError>) -> String {
    match source {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

impl Error {
    /// Create an error without a cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            field: None,
            context: BTreeMap::new(),
        }
    }

    /// Create an error wrapping a lower-level cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::new(kind, message)
        }
    }

    /// Attach the name of the field the error refers to.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a context entry. Later values for the same key win.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.context
    }
}

/// Failures reported by a delegate HTML parser.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("parser rejected input: {0}")]
    Rejected(String),
}
