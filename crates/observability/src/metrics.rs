//! 输出指标收集模块
//!
//! 记录每条 record 的输出情况 (条数、字节数、失败次数)。

use contracts::{OutputFormat, RecordKind, SinkOwnership};
use metrics::{counter, histogram};

/// 记录一条成功输出的 record
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_emitted;
///
/// channel.emit(target)?;
/// record_emitted(OutputFormat::Text, RecordKind::Target, 42);
/// ```
pub fn record_emitted(format: OutputFormat, kind: RecordKind, bytes: usize) {
    counter!(
        "aquery_records_emitted_total",
        "format" => format.name(),
        "label" => kind.label()
    )
    .increment(1);

    counter!("aquery_bytes_written_total", "format" => format.name()).increment(bytes as u64);

    histogram!("aquery_record_size_bytes", "format" => format.name()).record(bytes as f64);
}

/// 记录输出失败
pub fn record_emit_failure(format: OutputFormat, kind: RecordKind) {
    counter!(
        "aquery_emit_failures_total",
        "format" => format.name(),
        "label" => kind.label()
    )
    .increment(1);
}

/// 记录 channel 关闭
pub fn record_channel_closed(format: OutputFormat, ownership: SinkOwnership, success: bool) {
    let status = if success { "success" } else { "failure" };
    let ownership = match ownership {
        SinkOwnership::Retain => "retain",
        SinkOwnership::Close => "close",
    };
    counter!(
        "aquery_channels_closed_total",
        "format" => format.name(),
        "ownership" => ownership,
        "status" => status
    )
    .increment(1);
}

/// 统计摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
