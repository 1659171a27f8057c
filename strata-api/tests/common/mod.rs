//! Shared fixtures for API tests

#![allow(dead_code)]

use std::sync::Arc;
use strata_api::{MemoryFileSystem, RunConfig};
use strata_log::{Level, LogRingBuffer, Logger};
use strata_vfs::VirtualFileSystem;

/// In-memory project tree
pub fn project(files: &[(&str, &str)]) -> Arc<dyn VirtualFileSystem> {
    Arc::new(MemoryFileSystem::with_files(
        files.iter().map(|(path, text)| (*path, text.as_bytes().to_vec())),
    ))
}

/// Run config whose logger captures warnings and above
pub fn capturing(config: RunConfig) -> (RunConfig, Arc<LogRingBuffer>) {
    let ring = LogRingBuffer::new(128);
    let logger = Logger::new(Level::Warn).with_sink(ring.clone());
    (config.with_logger(logger), ring)
}
