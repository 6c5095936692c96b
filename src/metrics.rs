// Conversion metrics.
//
// A collector is an explicit object handed to the converter; there is no
// process-wide instance. Each counter is its own atomic, so concurrent
// conversions never contend on a shared lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::ErrorKind;
use crate::result::ChangeKind;

/// Sink for per-conversion measurements.
pub trait Metrics: Send + Sync {
    /// A conversion completed and produced a result.
    fn record_success(&self, duration: Duration, input_bytes: u64, output_bytes: u64);
    /// A conversion aborted with an error of `kind`.
    fn record_failure(&self, kind: ErrorKind);
    /// One change was applied.
    fn record_change(&self, kind: ChangeKind);
    /// Point-in-time copy of the counters.
    fn snapshot(&self) -> ConversionStats;
    /// Zero every counter.
    fn reset(&self);
}

/// Snapshot of conversion counters.
///
/// `total_conversions` is always `successful_conversions + failed_conversions`.
/// The per-kind maps only contain kinds that were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub total_conversions: u64,
    pub successful_conversions: u64,
    pub failed_conversions: u64,
    /// Mean duration over successful conversions.
    pub average_duration: Duration,
    pub total_bytes_in: u64,
    pub total_bytes_out: u64,
    pub changes_by_kind: BTreeMap<ChangeKind, u64>,
    pub errors_by_kind: BTreeMap<ErrorKind, u64>,
}

/// Lock-free metrics collector.
#[derive(Debug, Default)]
pub struct ConversionMetrics {
    successful: AtomicU64,
    failed: AtomicU64,
    duration_nanos: AtomicU64,
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
    changes: [AtomicU64; ChangeKind::ALL.len()],
    errors: [AtomicU64; ErrorKind::ALL.len()],
}

impl ConversionMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metrics for ConversionMetrics {
    fn record_success(&self, duration: Duration, input_bytes: u64, output_bytes: u64) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.duration_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.bytes_in.fetch_add(input_bytes, Ordering::Relaxed);
        self.bytes_out.fetch_add(output_bytes, Ordering::Relaxed);
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, kind: ErrorKind) {
        self.errors[kind.index()].fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_change(&self, kind: ChangeKind) {
        self.changes[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ConversionStats {
        let successful = self.successful.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let average_duration = match successful {
            0 => Duration::ZERO,
            n => Duration::from_nanos(self.duration_nanos.load(Ordering::Relaxed) / n),
        };

        ConversionStats {
            total_conversions: successful + failed,
            successful_conversions: successful,
            failed_conversions: failed,
            average_duration,
            total_bytes_in: self.bytes_in.load(Ordering::Relaxed),
            total_bytes_out: self.bytes_out.load(Ordering::Relaxed),
            changes_by_kind: nonzero(&ChangeKind::ALL, &self.changes),
            errors_by_kind: nonzero(&ErrorKind::ALL, &self.errors),
        }
    }

    fn reset(&self) {
        let counters = [
            &self.successful,
            &self.failed,
            &self.duration_nanos,
            &self.bytes_in,
            &self.bytes_out,
        ];
        for counter in counters
            .into_iter()
            .chain(&self.changes)
            .chain(&self.errors)
        {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

fn nonzero<K: Ord + Copy>(keys: &[K], counters: &[AtomicU64]) -> BTreeMap<K, u64> {
    keys.iter()
        .zip(counters)
        .filter_map(|(&key, counter)| match counter.load(Ordering::Relaxed) {
            0 => None,
            n => Some((key, n)),
        })
        .collect()
}

/// Collector that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn record_success(&self, _: Duration, _: u64, _: u64) {}

    fn record_failure(&self, _: ErrorKind) {}

    fn record_change(&self, _: ChangeKind) {}

    fn snapshot(&self) -> ConversionStats {
        ConversionStats::default()
    }

    fn reset(&self) {}
}
