//! FileSink - buffered output file

use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::PathBuf;

use tracing::debug;

/// Configuration for a file sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Append instead of truncating
    pub append: bool,
}

impl FileSinkConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
        }
    }
}

/// Open the file for writing, creating parent directories as needed
pub fn open_file(config: &FileSinkConfig) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(config.append)
        .truncate(!config.append)
        .open(&config.path)?;

    debug!(path = %config.path.display(), append = config.append, "file sink opened");
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/graph.pb");

        let mut sink = open_file(&FileSinkConfig::new(&path)).unwrap();
        sink.write_all(b"abc").unwrap();
        sink.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn test_truncate_and_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.txt");
        fs::write(&path, "old").unwrap();

        let mut sink = open_file(&FileSinkConfig::new(&path)).unwrap();
        sink.write_all(b"new").unwrap();
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let config = FileSinkConfig {
            path: path.clone(),
            append: true,
        };
        let mut sink = open_file(&config).unwrap();
        sink.write_all(b"+more").unwrap();
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new+more");
    }
}
