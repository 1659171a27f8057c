//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// An in-memory file system implementation.
///
/// Files live in a `BTreeMap` keyed by normalized path, so directory
/// listings come out sorted. Directories are implicit: a directory exists
/// when at least one file lives below it.
///
/// # Example
/// ```
/// use strata_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.insert("/src/app/Main.strata", "class Main {}");
/// assert!(fs.is_dir(Path::new("/src/app")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path.as_ref(), content);
        }
        fs
    }

    /// Add or replace a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let key = normalize_path(path.as_ref());
        let mut files = match self.files.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        files.insert(key, content.into());
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().map(|files| files.len()).unwrap_or(0)
    }

    /// Whether no file is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_guard(
        &self,
    ) -> VfsResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.files.read().map_err(|_| VfsError::Io {
            message: String::from("Lock poisoned"),
        })
    }
}

/// Normalize a path string for internal storage.
/// Uses forward slashes and drops a trailing separator.
fn normalize_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.len() > 1 {
        text.trim_end_matches('/').to_string()
    } else {
        text
    }
}

fn directory_prefix(dir: &Path) -> String {
    let normalized = normalize_path(dir);
    if normalized.ends_with('/') {
        normalized
    } else {
        format!("{normalized}/")
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize_path(path);
        let files = self.read_guard()?;
        files
            .get(&normalized)
            .cloned()
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let normalized = normalize_path(path);
        match self.read_guard() {
            Ok(files) => files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let prefix = directory_prefix(path);
        match self.read_guard() {
            Ok(files) => files
                .range(prefix.clone()..)
                .next()
                .map(|(key, _)| key.starts_with(&prefix))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    fn list_files(&self, dir: &Path, extension: &str) -> VfsResult<Vec<PathBuf>> {
        if self.is_file(dir) {
            return Err(VfsError::NotADirectory {
                path: normalize_path(dir),
            });
        }
        let prefix = directory_prefix(dir);
        let files = self.read_guard()?;
        let suffix = format!(".{extension}");
        Ok(files
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| key.ends_with(&suffix))
            .map(|(key, _)| PathBuf::from(key))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_fs_is_empty() {
        let fs = MemoryFileSystem::new();
        assert!(fs.is_empty());
        assert!(!fs.exists(Path::new("/anything.strata")));
    }

    #[test]
    fn test_insert_and_read() {
        let fs = MemoryFileSystem::new();
        fs.insert("/src/A.strata", "class A {}");

        assert_eq!(fs.read_file(Path::new("/src/A.strata")).unwrap(), b"class A {}");
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_read_to_string_rejects_invalid_utf8() {
        let fs = MemoryFileSystem::with_files([("/bad.strata", vec![0xff, 0xfe, 0x00])]);

        let result = fs.read_to_string(Path::new("/bad.strata"));
        assert!(matches!(result, Err(VfsError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_read_nonexistent() {
        let fs = MemoryFileSystem::new();
        let result = fs.read_file(Path::new("/nonexistent.strata"));

        assert!(matches!(result, Err(VfsError::NotFound { .. })));
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let fs = MemoryFileSystem::new();
        fs.insert("\\src\\a\\B.strata", "class B {}");

        assert!(fs.is_file(Path::new("/src/a/B.strata")));
    }

    #[test]
    fn test_implicit_directories() {
        let fs = MemoryFileSystem::with_files([("/src/app/Main.strata", b"".to_vec())]);

        assert!(fs.is_dir(Path::new("/src")));
        assert!(fs.is_dir(Path::new("/src/app/")));
        assert!(!fs.is_dir(Path::new("/src/ap")));
        assert!(!fs.is_dir(Path::new("/src/app/Main.strata")));
        assert!(fs.exists(Path::new("/src/app")));
    }

    #[test]
    fn test_list_files_filters_and_sorts() {
        let fs = MemoryFileSystem::with_files([
            ("/src/b/B.strata", b"".to_vec()),
            ("/src/a/A.strata", b"".to_vec()),
            ("/src/a/notes.txt", b"".to_vec()),
            ("/srcx/C.strata", b"".to_vec()),
            ("/src/module-info.strata", b"".to_vec()),
        ]);

        let listed = fs.list_files(Path::new("/src"), "strata").unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("/src/a/A.strata"),
                PathBuf::from("/src/b/B.strata"),
                PathBuf::from("/src/module-info.strata"),
            ]
        );
    }

    #[test]
    fn test_list_files_on_file_is_error() {
        let fs = MemoryFileSystem::with_files([("/src/A.strata", b"".to_vec())]);

        let result = fs.list_files(Path::new("/src/A.strata"), "strata");
        assert!(matches!(result, Err(VfsError::NotADirectory { .. })));
    }

    #[test]
    fn test_clone_shares_data() {
        let fs1 = MemoryFileSystem::new();
        let fs2 = fs1.clone();

        fs2.insert("/shared.strata", "class S {}");
        assert!(fs1.is_file(Path::new("/shared.strata")));
    }

    #[test]
    fn test_concurrent_reads() {
        let fs = MemoryFileSystem::with_files([("/test.strata", b"concurrent".to_vec())]);
        let mut handles = vec![];

        for _ in 0..8 {
            let fs_clone = fs.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    let content = fs_clone.read_file(Path::new("/test.strata")).unwrap();
                    assert_eq!(content, b"concurrent");
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
