//! Sink provisioning
//!
//! Resolves where a run's output goes and opens it as a buffered writer.

mod file;

pub use self::file::{open_file, FileSinkConfig};

use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use contracts::ContractError;

/// Type-erased sink returned by [`SinkTarget::open`]
pub type BoxedSink = Box<dyn Write + Send>;

/// Output destination of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// Process stdout; closing it only flushes
    Stdout,
    /// A file, truncated on open unless appending
    File(FileSinkConfig),
}

impl SinkTarget {
    /// `-` means stdout, anything else is a file path
    pub fn parse(path: &str) -> Self {
        match path {
            "-" => Self::Stdout,
            path => Self::File(FileSinkConfig::new(path)),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileSinkConfig::new(path))
    }

    /// Open the destination for writing
    pub fn open(&self) -> Result<BoxedSink, ContractError> {
        match self {
            Self::Stdout => Ok(Box::new(BufWriter::new(io::stdout()))),
            Self::File(config) => open_file(config)
                .map(|w| Box::new(w) as BoxedSink)
                .map_err(|e| ContractError::sink_open(self.to_string(), e.to_string())),
        }
    }
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("-"),
            Self::File(config) => write!(f, "{}", config.path.display()),
        }
    }
}
