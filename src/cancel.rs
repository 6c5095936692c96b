// Cooperative cancellation.
//
// A conversion polls its signal at fixed checkpoints between phases. A phase
// that has started always runs to completion, so cancellation latency is
// bounded by the longest single phase.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, ErrorKind};

/// Points at which a conversion polls for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    BeforeScan,
    AfterParse,
    AfterTransform,
    BeforeReturn,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::BeforeScan,
        Checkpoint::AfterParse,
        Checkpoint::AfterTransform,
        Checkpoint::BeforeReturn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Checkpoint::BeforeScan => "before-scan",
            Checkpoint::AfterParse => "after-parse",
            Checkpoint::AfterTransform => "after-transform",
            Checkpoint::BeforeReturn => "before-return",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a signal asked the conversion to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Triggered explicitly.
    Canceled,
    /// A deadline passed.
    TimedOut,
}

/// Poll-based cancellation source.
pub trait CancelSignal: Send + Sync {
    /// Return `Some` to stop the conversion at `checkpoint`.
    fn poll(&self, checkpoint: Checkpoint) -> Option<CancelReason>;
}

/// Signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Uncancellable;

impl CancelSignal for Uncancellable {
    fn poll(&self, _: Checkpoint) -> Option<CancelReason> {
        None
    }
}

/// Shareable cancellation token with an optional deadline.
///
/// Clones share the cancel flag, so any clone can cancel every conversion
/// polling the token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that times out `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            canceled: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Token that times out at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            canceled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Current state. Explicit cancellation wins over an expired deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.is_canceled() {
            return Some(CancelReason::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::TimedOut),
            _ => None,
        }
    }
}

impl CancelSignal for CancelToken {
    fn poll(&self, _: Checkpoint) -> Option<CancelReason> {
        self.reason()
    }
}

/// Poll `signal`, turning a stop request into a `Canceled` or `Timeout` error.
pub(crate) fn checkpoint(signal: &dyn CancelSignal, at: Checkpoint) -> Result<(), Error> {
    let Some(reason) = signal.poll(at) else {
        return Ok(());
    };
    tracing::debug!(checkpoint = %at, ?reason, "cancellation observed");

    let err = match reason {
        CancelReason::Canceled => {
            Error::new(ErrorKind::Canceled, format!("conversion canceled at {at}"))
        }
        CancelReason::TimedOut => {
            Error::new(ErrorKind::Timeout, format!("conversion timed out at {at}"))
        }
    };
    Err(err.with_context("checkpoint", at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_quiet() {
        let token = CancelToken::new();
        assert_eq!(token.reason(), None);
        assert!(checkpoint(&token, Checkpoint::BeforeScan).is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_canceled());
        let err = checkpoint(&token, Checkpoint::AfterParse).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Canceled);
        assert_eq!(
            err.context().get("checkpoint").map(String::as_str),
            Some("after-parse")
        );
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let token = CancelToken::with_timeout(Duration::ZERO);
        assert_eq!(token.reason(), Some(CancelReason::TimedOut));
        let err = checkpoint(&token, Checkpoint::BeforeScan).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_explicit_cancel_wins_over_deadline() {
        let token = CancelToken::with_timeout(Duration::ZERO);
        token.cancel();
        assert_eq!(token.reason(), Some(CancelReason::Canceled));
    }

    #[test]
    fn test_distant_deadline_is_quiet() {
        let token = CancelToken::with_timeout(Duration::from_secs(3600));
        assert_eq!(token.reason(), None);
    }
}
