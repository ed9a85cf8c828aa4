use std::fs;
use std::path::Path;

use tracing::debug;

use crate::contract::FileStore;
use crate::error::SyncError;

/// Reads and writes documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileStore for LocalFiles {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SyncError> {
        debug!(path = %path.display(), "Reading document");
        fs::read(path).map_err(|e| SyncError::io(path, e))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        debug!(path = %path.display(), bytes = bytes.len(), "Writing document");
        fs::write(path, bytes).map_err(|e| SyncError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts/2024/post.md");
        LocalFiles.write(&path, b"hello").unwrap();
        assert_eq!(LocalFiles.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn reading_a_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = LocalFiles.read(&dir.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }
}
