//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::{Path, PathBuf};

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local source trees.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem {
    base: Option<PathBuf>,
}

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a native file system that resolves relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn map_io(path: &Path, err: std::io::Error) -> VfsError {
    let path = path.to_string_lossy().to_string();
    match err.kind() {
        std::io::ErrorKind::NotFound => VfsError::NotFound { path },
        std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied { path },
        _ => err.into(),
    }
}

fn collect_files(dir: &Path, suffix: &str, out: &mut Vec<PathBuf>) -> VfsResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| map_io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| map_io(dir, e))?.path();
        if path.is_dir() {
            collect_files(&path, suffix, out)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(suffix) {
            out.push(path);
        }
    }
    Ok(())
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let resolved = self.resolve(path);
        std::fs::read(&resolved).map_err(|e| map_io(&resolved, e))
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn list_files(&self, dir: &Path, extension: &str) -> VfsResult<Vec<PathBuf>> {
        let resolved = self.resolve(dir);
        if resolved.is_file() {
            return Err(VfsError::NotADirectory {
                path: resolved.to_string_lossy().to_string(),
            });
        }
        let mut files = Vec::new();
        collect_files(&resolved, extension, &mut files)?;
        files.sort();
        Ok(files)
    }
}
