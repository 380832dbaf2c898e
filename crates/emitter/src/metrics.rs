//! Channel metrics for observability

use contracts::RecordKind;
use observability::{RunningStats, StatsSummary};

/// In-process counters of one output channel
///
/// Never influences what is written.
#[derive(Debug, Default)]
pub struct ChannelMetrics {
    /// Records written, indexed by `RecordKind::index`
    per_kind: [u64; 8],
    /// Total bytes handed to the sink
    bytes_written: u64,
    /// Total write failures
    failure_count: u64,
    /// Encoded record sizes
    record_sizes: RunningStats,
}

impl ChannelMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successfully written record
    pub fn record_emitted(&mut self, kind: RecordKind, bytes: usize) {
        self.per_kind[kind.index()] += 1;
        self.bytes_written += bytes as u64;
        self.record_sizes.push(bytes as f64);
    }

    pub fn inc_failure_count(&mut self) {
        self.failure_count += 1;
    }

    /// Records written for one category
    pub fn count(&self, kind: RecordKind) -> u64 {
        self.per_kind[kind.index()]
    }

    /// Records written across all categories
    pub fn write_count(&self) -> u64 {
        self.per_kind.iter().sum()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            per_kind: self.per_kind,
            write_count: self.write_count(),
            bytes_written: self.bytes_written,
            failure_count: self.failure_count,
            record_size: StatsSummary::from(&self.record_sizes),
        }
    }
}

/// Snapshot of channel metrics (for reporting)
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub per_kind: [u64; 8],
    pub write_count: u64,
    pub bytes_written: u64,
    pub failure_count: u64,
    pub record_size: StatsSummary,
}

impl MetricsSnapshot {
    pub fn count(&self, kind: RecordKind) -> u64 {
        self.per_kind[kind.index()]
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records, {} bytes, {} failures",
            self.write_count, self.bytes_written, self.failure_count
        )?;
        for kind in RecordKind::ALL {
            let count = self.count(kind);
            if count > 0 {
                write!(f, ", {}={}", kind.label(), count)?;
            }
        }
        Ok(())
    }
}
