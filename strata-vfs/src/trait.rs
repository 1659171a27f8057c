//! VirtualFileSystem trait definition

use crate::error::{VfsError, VfsResult};
use std::path::{Path, PathBuf};

/// Virtual File System trait
///
/// Read-only view of source storage, so the compiler never touches `std::fs`
/// directly.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system (tests, embedding)
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents as bytes
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Check if path exists (file or directory)
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List every file below `dir` whose extension is `extension`
    ///
    /// The result is sorted so that batches built from a directory are
    /// deterministic.
    fn list_files(&self, dir: &Path, extension: &str) -> VfsResult<Vec<PathBuf>>;

    /// Read a file as UTF-8 source text
    fn read_to_string(&self, path: &Path) -> VfsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes).map_err(|e| VfsError::InvalidUtf8 {
            path: path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })
    }
}
