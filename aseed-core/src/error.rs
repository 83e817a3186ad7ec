//! Export failure reporting
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced to the caller when an export fails.
///
/// An export aborts on the first failure. Files already written to disk are
/// left in place; there is no transactional rollback.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An output file could not be created or written.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_the_path() {
        let err = ExportError::io(
            Path::new("scene.appleseed"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("scene.appleseed"));
        assert!(message.contains("denied"));
    }
}
