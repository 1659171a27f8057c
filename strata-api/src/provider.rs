//! Sourcepath-backed unit lookup

use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_core::lookup::{ProviderError, UnitProvider};
use strata_core::SourceUnit;
use strata_vfs::{VfsError, VirtualFileSystem};

/// Source file extension of ordinary units
pub const SOURCE_EXTENSION: &str = "strata";

/// Finds `a.b.C` as `<root>/a/b/C.strata` under the first root that has it
pub struct SourcepathProvider {
    vfs: Arc<dyn VirtualFileSystem>,
    roots: Vec<PathBuf>,
}

impl SourcepathProvider {
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, roots: Vec<PathBuf>) -> Self {
        Self { vfs, roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl UnitProvider for SourcepathProvider {
    fn find_unit(&mut self, qualified_name: &str) -> Result<Option<SourceUnit>, ProviderError> {
        let relative = format!("{}.{SOURCE_EXTENSION}", qualified_name.replace('.', "/"));

        for root in &self.roots {
            let path = root.join(&relative);
            if !self.vfs.is_file(&path) {
                continue;
            }
            let content = self.vfs.read_to_string(&path).map_err(|err| provider_error(&path, err))?;
            return Ok(Some(SourceUnit::new(unit_name(&path), content)));
        }
        Ok(None)
    }
}

fn provider_error(path: &Path, err: VfsError) -> ProviderError {
    let path = unit_name(path);
    match err {
        VfsError::InvalidUtf8 { .. } => ProviderError::InvalidUtf8 { path },
        other => ProviderError::Io {
            path,
            message: other.to_string(),
        },
    }
}

/// Unit name of a file: its path with `/` separators
pub fn unit_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
