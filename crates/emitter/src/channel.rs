//! OutputChannel - streams records to a single sink in one format

use std::fmt;
use std::io::{self, Write};

use bytes::{BufMut, BytesMut};
use contracts::{OutputFormat, Record, SinkOwnership, TextFormat};
use tracing::{debug, error, info, instrument, trace};

use crate::error::{CloseError, EmitError};
use crate::json;
use crate::metrics::{ChannelMetrics, MetricsSnapshot};

/// Writes each record to the sink as soon as it is emitted.
///
/// Output per format:
/// - [`OutputFormat::Binary`]: the record as a length-delimited field of
///   `ActionGraphContainer`, no container framing. Concatenated fragments parse
///   as one container holding every record in emission order.
/// - [`OutputFormat::Text`]: `<label> {\n<text format body>}\n`
/// - [`OutputFormat::Json`]: compact, HTML-safe JSON object followed by `\n`
///
/// Emission is sequential and order-preserving. [`OutputChannel::close`]
/// consumes the channel.
pub struct OutputChannel<W: Write> {
    format: OutputFormat,
    ownership: SinkOwnership,
    sink: W,
    /// Encoded form of the record in flight, reused across emits
    scratch: BytesMut,
    metrics: ChannelMetrics,
}

impl<W: Write> fmt::Debug for OutputChannel<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputChannel")
            .field("format", &self.format)
            .field("ownership", &self.ownership)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl<W: Write> OutputChannel<W> {
    /// Create a channel using the format's default sink ownership
    pub fn new(format: OutputFormat, sink: W) -> Self {
        Self::with_ownership(format, format.default_ownership(), sink)
    }

    pub fn with_ownership(format: OutputFormat, ownership: SinkOwnership, sink: W) -> Self {
        debug!(format = %format, ownership = ?ownership, "output channel opened");
        Self {
            format,
            ownership,
            sink,
            scratch: BytesMut::new(),
            metrics: ChannelMetrics::new(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn ownership(&self) -> SinkOwnership {
        self.ownership
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Emit one record of any category
    pub fn emit(&mut self, record: impl Into<Record>) -> Result<(), EmitError> {
        self.emit_record(&record.into())
    }

    /// Emit records in iteration order, stopping at the first failure
    pub fn emit_all<I>(&mut self, records: I) -> Result<(), EmitError>
    where
        I: IntoIterator,
        I::Item: Into<Record>,
    {
        for record in records {
            self.emit(record)?;
        }
        Ok(())
    }

    /// Emit a borrowed record
    pub fn emit_record(&mut self, record: &Record) -> Result<(), EmitError> {
        let kind = record.kind();

        let written = self
            .encode(record)
            .and_then(|()| self.sink.write_all(&self.scratch));
        if let Err(source) = written {
            self.metrics.inc_failure_count();
            observability::record_emit_failure(self.format, kind);
            error!(format = %self.format, label = kind.label(), error = %source, "Write failed");
            return Err(EmitError::Write {
                format: self.format.name(),
                label: kind.label(),
                source,
            });
        }

        let bytes = self.scratch.len();
        self.metrics.record_emitted(kind, bytes);
        observability::record_emitted(self.format, kind, bytes);
        trace!(format = %self.format, label = kind.label(), bytes, "record emitted");
        Ok(())
    }

    /// Render `record` into the scratch buffer according to the format
    fn encode(&mut self, record: &Record) -> io::Result<()> {
        self.scratch.clear();
        match self.format {
            OutputFormat::Binary => {
                self.scratch.reserve(record.encoded_field_len());
                record.encode_field(&mut self.scratch);
            }
            OutputFormat::Text => {
                self.scratch.put_slice(record.label().as_bytes());
                self.scratch.put_slice(b" {\n");
                self.scratch.put_slice(record.to_text().as_bytes());
                self.scratch.put_slice(b"}\n");
            }
            OutputFormat::Json => {
                json::to_writer((&mut self.scratch).writer(), record)?;
                self.scratch.put_u8(b'\n');
            }
        }
        Ok(())
    }

    /// Finish the run.
    ///
    /// Always flushes. With [`SinkOwnership::Retain`] the still-open sink is
    /// handed back; with [`SinkOwnership::Close`] it is closed and `None` is
    /// returned. A failed flush does not change who owns the sink: a retained
    /// sink travels back inside the [`CloseError`].
    #[instrument(name = "output_channel_close", skip(self), fields(format = %self.format))]
    pub fn close(mut self) -> Result<Option<W>, CloseError<W>> {
        let flushed = self.sink.flush();
        observability::record_channel_closed(self.format, self.ownership, flushed.is_ok());
        if let Err(source) = flushed {
            error!(format = %self.format, error = %source, "Flush failed");
            let error = EmitError::Close {
                format: self.format.name(),
                source,
            };
            return Err(CloseError::new(error, self.release()));
        }

        info!(
            format = %self.format,
            ownership = ?self.ownership,
            summary = %self.metrics.snapshot(),
            "output channel closed"
        );

        Ok(self.release())
    }

    /// Hand the sink back or close it, per ownership
    fn release(self) -> Option<W> {
        match self.ownership {
            SinkOwnership::Retain => Some(self.sink),
            SinkOwnership::Close => {
                drop(self.sink);
                None
            }
        }
    }
}
