// Conversion orchestrator.
//
// Pipeline: scan raw text → delegate parse → validate or normalize → serialize.
// Strict mode turns every checked violation into an error; lenient mode
// records parse and validation problems on the result and keeps going.
// Cancellation is polled between phases, never inside one.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::cancel::{checkpoint, CancelSignal, Checkpoint, Uncancellable};
use crate::error::{Error, ErrorKind, Result};
use crate::metrics::{Metrics, NoopMetrics};
use crate::parser::{Html5everParser, HtmlParser};
use crate::result::{Change, ConversionResult};
use crate::scan::{scan, Defect};
use crate::serialize::write_node;
use crate::tree::{normalize, validate};
use crate::Options;

/// HTML to XHTML-strict converter.
///
/// A converter holds no per-conversion state and can be shared across
/// threads. Its metrics collector is the only state conversions share.
pub struct Converter {
    parser: Box<dyn HtmlParser>,
    metrics: Arc<dyn Metrics>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

impl Converter {
    /// Converter with the html5ever parser and metrics disabled.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(NoopMetrics))
    }

    /// Converter reporting to `metrics`.
    pub fn with_metrics(metrics: Arc<dyn Metrics>) -> Self {
        Self {
            parser: Box::new(Html5everParser),
            metrics,
        }
    }

    /// Replace the delegate parser.
    pub fn with_parser(mut self, parser: impl HtmlParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// The collector this converter reports to.
    pub fn metrics(&self) -> &Arc<dyn Metrics> {
        &self.metrics
    }

    /// Convert `input` to XHTML-strict.
    ///
    /// Returns either a result (possibly carrying recovered errors in lenient
    /// mode) or an error, never both.
    pub fn convert(&self, input: &[u8], options: &Options) -> Result<ConversionResult> {
        self.convert_with_cancellation(&Uncancellable, input, options)
    }

    /// Convert `input`, polling `signal` before scanning, after parsing,
    /// after the validate/fix pass and before returning.
    pub fn convert_with_cancellation(
        &self,
        signal: &dyn CancelSignal,
        input: &[u8],
        options: &Options,
    ) -> Result<ConversionResult> {
        let started = Instant::now();
        debug!(
            input_bytes = input.len(),
            strict = options.strict_mode,
            auto_fix = options.auto_fix,
            "conversion started"
        );

        match self.run(signal, input, options) {
            Ok(result) => {
                self.metrics.record_success(
                    started.elapsed(),
                    result.input_bytes() as u64,
                    result.output_bytes() as u64,
                );
                for change in result.changes() {
                    self.metrics.record_change(change.kind);
                }
                debug!(
                    output_bytes = result.output_bytes(),
                    changes = result.changes().len(),
                    recovered_errors = result.errors().len(),
                    "conversion finished"
                );
                Ok(result)
            }
            Err(err) => {
                self.metrics.record_failure(err.kind());
                debug!(kind = %err.kind(), error = %err, "conversion aborted");
                Err(err)
            }
        }
    }

    /// Check `input` against every XHTML-strict rule, failing on the first
    /// violation. Text defects are reported before structural ones.
    pub fn validate(&self, input: &[u8]) -> Result<()> {
        self.validate_with_cancellation(&Uncancellable, input)
    }

    /// [`validate`](Self::validate) polling `signal` between phases.
    pub fn validate_with_cancellation(&self, signal: &dyn CancelSignal, input: &[u8]) -> Result<()> {
        checkpoint(signal, Checkpoint::BeforeScan)?;
        if let Some(defect) = scan(&String::from_utf8_lossy(input)).first() {
            return Err(defect_error(defect));
        }

        let parsed = self.parser.parse(input);
        if let Some(err) = parsed.error {
            return Err(Error::with_source(ErrorKind::ParseFailed, "failed to parse HTML", err));
        }
        checkpoint(signal, Checkpoint::AfterParse)?;

        validate(&parsed.document).map_err(|violation| {
            Error::with_source(ErrorKind::ValidationFailed, "validation failed", violation)
        })?;
        checkpoint(signal, Checkpoint::AfterTransform)
    }

    fn run(
        &self,
        signal: &dyn CancelSignal,
        input: &[u8],
        options: &Options,
    ) -> Result<ConversionResult> {
        checkpoint(signal, Checkpoint::BeforeScan)?;

        let mut changes: Vec<Change> = Vec::new();
        let mut errors: Vec<Error> = Vec::new();

        // Scan: text-level defects the parser would otherwise repair silently.
        if options.strict_mode || options.auto_fix {
            let defects = scan(&String::from_utf8_lossy(input));
            trace!(defects = defects.len(), "scan finished");
            if options.strict_mode {
                if let Some(defect) = defects.first() {
                    return Err(defect_error(defect));
                }
            }
            if options.auto_fix {
                changes.extend(defects.iter().map(Change::from));
            }
        }

        // Parse.
        let parsed = self.parser.parse(input);
        let mut document = parsed.document;
        if let Some(err) = parsed.error {
            let err = Error::with_source(ErrorKind::ParseFailed, "failed to parse HTML", err);
            if options.strict_mode {
                return Err(err);
            }
            warn!(error = %err, "continuing with recovered parse tree");
            errors.push(err);
        }
        checkpoint(signal, Checkpoint::AfterParse)?;

        // Validate or fix.
        if options.auto_fix {
            changes.extend(normalize(&mut document));
        } else if let Err(violation) = validate(&document) {
            let err =
                Error::with_source(ErrorKind::ValidationFailed, "validation failed", violation);
            if options.strict_mode {
                return Err(err);
            }
            warn!(error = %err, "continuing with non-conformant tree");
            errors.push(err);
        }
        checkpoint(signal, Checkpoint::AfterTransform)?;

        // Serialize.
        let mut output = Vec::with_capacity(input.len() + input.len() / 8);
        write_node(&document, &mut output).map_err(|err| {
            Error::with_source(ErrorKind::ConversionFailed, "failed to render XHTML", err)
        })?;
        checkpoint(signal, Checkpoint::BeforeReturn)?;

        Ok(ConversionResult::new(
            input.len(),
            output,
            changes,
            errors,
            parsed.warnings,
        ))
    }
}

/// Strict-mode error for the first text defect.
fn defect_error(defect: &Defect) -> Error {
    Error::new(ErrorKind::ValidationFailed, defect.to_string())
        .with_context("defect", defect.kind)
        .with_context("line", defect.line)
        .with_context("column", defect.column)
}
