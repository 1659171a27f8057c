//! Strata API - batch compilation entry point
//!
//! Provides:
//! - Loading batch sources through a virtual file system
//! - Sourcepath lookup for units referenced but not submitted (`SourcepathProvider`)
//! - Run configuration (`RunConfig`) and unified error handling (`StrataError`)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_log::{debug, info};
use strata_vfs::{VfsResult, VirtualFileSystem};

use strata_core::driver::{CollectingSink, Compiler, LogProgress};
use strata_core::lookup::LookupEnvironment;

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{log_level, RunConfig};
pub use error::StrataError;
pub use provider::{unit_name, SourcepathProvider, SOURCE_EXTENSION};
pub use types::BatchOutput;

// Re-export config and core types
pub use strata_config::{CompilerConfig, LogLevel, ProjectManifest};
pub use strata_core::{
    Category, CompilationResult, DeclarationTree, Diagnostic, Severity, SourceUnit, TreeState,
};
pub use strata_core::driver::DRIVER_TARGET;
pub use strata_vfs::{MemoryFileSystem, NativeFileSystem};

const API_TARGET: &str = "strata::api";

/// Compile the files at `paths` as one batch
///
/// Every file is read before compilation starts, so an unreadable or non-UTF-8
/// source fails the call without running anything.
pub fn compile_batch<P: AsRef<Path>>(
    vfs: Arc<dyn VirtualFileSystem>,
    paths: &[P],
    config: &RunConfig,
) -> Result<BatchOutput, StrataError> {
    let units = load_units(vfs.as_ref(), paths)?;
    info!(config.logger, target: API_TARGET, "loaded {} source units", units.len());

    let mut env = LookupEnvironment::new(&config.compiler, config.logger.clone());
    if !config.sourcepath.is_empty() {
        debug!(config.logger, target: API_TARGET, "sourcepath: {:?}", config.sourcepath);
        env = env.with_provider(SourcepathProvider::new(vfs, config.sourcepath.clone()));
    }
    let mut compiler = Compiler::new(config.compiler.clone(), env, CollectingSink::new())
        .with_progress(LogProgress::new(config.logger.clone()));

    let trees = compiler.build_units(units)?;
    let (_, sink, _) = compiler.into_parts();

    let output = BatchOutput {
        units: trees.len(),
        errors: sink.error_count(),
        warnings: sink.warning_count(),
        results: sink.into_results(),
        trees,
    };
    info!(
        config.logger,
        target: API_TARGET,
        "batch finished: {} units, {} errors, {} warnings",
        output.units,
        output.errors,
        output.warnings
    );
    Ok(output)
}

/// Read each path as a source unit named after its path
pub fn load_units<P: AsRef<Path>>(vfs: &dyn VirtualFileSystem, paths: &[P]) -> VfsResult<Vec<SourceUnit>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let content = vfs.read_to_string(path)?;
            Ok(SourceUnit::new(unit_name(path), content))
        })
        .collect()
}

/// Expand source entries: directories contribute every `.strata` file below them
///
/// Module descriptors in compiled form are picked up as well.
pub fn expand_sources<P: AsRef<Path>>(vfs: &dyn VirtualFileSystem, entries: &[P]) -> VfsResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        if vfs.is_dir(entry) {
            files.extend(vfs.list_files(entry, SOURCE_EXTENSION)?);
            files.extend(vfs.list_files(entry, "stratac")?);
        } else {
            files.push(entry.to_path_buf());
        }
    }
    Ok(files)
}
