//! Emitter error types

use std::fmt;
use std::io;

use thiserror::Error;

/// Emission failure
///
/// Every variant wraps the I/O error that aborted the run; nothing is retried
/// and bytes already written stay written.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Writing a record to the sink failed
    #[error("failed to write {label} record as {format}: {source}")]
    Write {
        format: &'static str,
        label: &'static str,
        #[source]
        source: io::Error,
    },

    /// Flushing the sink at close failed
    #[error("failed to close {format} output: {source}")]
    Close {
        format: &'static str,
        #[source]
        source: io::Error,
    },
}

impl EmitError {
    /// Underlying I/O error
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Write { source, .. } | Self::Close { source, .. } => source,
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.io_error().kind()
    }
}

/// Failure of [`OutputChannel::close`](crate::OutputChannel::close)
///
/// Like [`io::IntoInnerError`], a sink the caller retains comes back with the
/// error instead of being dropped. A sink owned by the channel is closed
/// regardless.
pub struct CloseError<W> {
    error: EmitError,
    sink: Option<W>,
}

impl<W> CloseError<W> {
    pub(crate) fn new(error: EmitError, sink: Option<W>) -> Self {
        Self { error, sink }
    }

    pub fn error(&self) -> &EmitError {
        &self.error
    }

    /// The still-open sink, when ownership was `Retain`
    pub fn into_sink(self) -> Option<W> {
        self.sink
    }

    pub fn into_parts(self) -> (EmitError, Option<W>) {
        (self.error, self.sink)
    }
}

impl<W> fmt::Debug for CloseError<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseError")
            .field("error", &self.error)
            .field("sink_retained", &self.sink.is_some())
            .finish()
    }
}

impl<W> fmt::Display for CloseError<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<W> std::error::Error for CloseError<W> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.io_error())
    }
}

impl<W> From<CloseError<W>> for EmitError {
    fn from(err: CloseError<W>) -> Self {
        err.error
    }
}
