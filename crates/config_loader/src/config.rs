//! Run configuration model

use contracts::{ContractError, OutputFormat, SinkOwnership};
use emitter::{BoxedSink, FileSinkConfig, OutputChannel, SinkTarget};
use observability::ObservabilityConfig;
use serde::{Deserialize, Serialize};

/// Complete configuration of one emitter run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitterConfig {
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: ObservabilityConfig,
}

/// Where and how records are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// `proto`, `textproto` or `jsonproto`
    pub format: OutputFormat,

    /// `-` for stdout, otherwise a file path
    #[serde(default = "default_path")]
    pub path: String,

    /// Overrides the format's default sink ownership
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<SinkOwnership>,

    /// Append to an existing file instead of truncating it
    #[serde(default)]
    pub append: bool,
}

fn default_path() -> String {
    "-".to_string()
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            path: default_path(),
            ownership: None,
            append: false,
        }
    }

    pub fn is_stdout(&self) -> bool {
        self.path == "-"
    }

    /// Effective ownership: explicit override or the format default
    pub fn ownership(&self) -> SinkOwnership {
        self.ownership.unwrap_or_else(|| self.format.default_ownership())
    }

    pub fn sink_target(&self) -> SinkTarget {
        match SinkTarget::parse(&self.path) {
            SinkTarget::File(config) => SinkTarget::File(FileSinkConfig {
                append: self.append,
                ..config
            }),
            stdout => stdout,
        }
    }
}

impl EmitterConfig {
    pub fn new(output: OutputConfig) -> Self {
        Self {
            output,
            logging: ObservabilityConfig::default(),
        }
    }

    /// Install the `[logging]` section as the process-wide tracing subscriber,
    /// plus the Prometheus exporter when `metrics_port` is set
    ///
    /// Once per process, before the channel is opened.
    pub fn init_observability(&self) -> anyhow::Result<()> {
        observability::init_with_config(self.logging.clone())
    }

    /// Provision the configured sink and build the channel for the run
    pub fn open_channel(&self) -> Result<OutputChannel<BoxedSink>, ContractError> {
        emitter::open_channel(
            &self.output.sink_target(),
            self.output.format,
            Some(self.output.ownership()),
        )
    }
}
