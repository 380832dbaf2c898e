//! # Emitter
//!
//! Streamed output of action graph records.
//!
//! Responsibilities:
//! - Encode each `Record` as soon as it is emitted (binary / text / JSON lines)
//! - Keep emission order, never buffer a whole container
//! - Apply the sink ownership rule at close
//! - Provision the sink (stdout or file) for a run

pub mod channel;
pub mod error;
pub mod json;
pub mod metrics;
pub mod sinks;

pub use channel::OutputChannel;
pub use contracts::{OutputFormat, Record, RecordKind, SinkOwnership};
pub use error::{CloseError, EmitError};
pub use metrics::{ChannelMetrics, MetricsSnapshot};
pub use sinks::{BoxedSink, FileSinkConfig, SinkTarget};

/// Open `target` and wrap it in a channel
///
/// `ownership` falls back to the format's default.
pub fn open_channel(
    target: &SinkTarget,
    format: OutputFormat,
    ownership: Option<SinkOwnership>,
) -> Result<OutputChannel<BoxedSink>, contracts::ContractError> {
    let sink = target.open()?;
    let ownership = ownership.unwrap_or(format.default_ownership());
    tracing::debug!(sink = %target, format = %format, "sink provisioned");
    Ok(OutputChannel::with_ownership(format, ownership, sink))
}
