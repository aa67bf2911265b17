//! Scan failure modes.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a scan. The first one encountered wins; workers keep
/// draining the file queue so the pool always terminates.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The OS failed during directory traversal.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file's bytes are not valid UTF-8.
    #[error("invalid UTF-8 encoding in {}", path.display())]
    Encoding { path: PathBuf },
}

impl From<walkdir::Error> for ScanError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        ScanError::Walk { path, source }
    }
}
