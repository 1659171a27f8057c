//! Fixtures for end-to-end batch runs

#![allow(dead_code)]

use std::sync::Arc;
use strata_log::{Level, LogConfig, LogRingBuffer};
use strata_workspace::{compile_batch, BatchOutput, CompilerConfig, MemoryFileSystem, RunConfig};

pub struct Outcome {
    pub output: BatchOutput,
    pub ring: Arc<LogRingBuffer>,
}

impl Outcome {
    pub fn names(&self) -> Vec<&str> {
        self.output.trees.iter().map(|t| t.file_name()).collect()
    }

    pub fn emitted(&self) -> Vec<&str> {
        self.output.results.iter().map(|r| r.file_name.as_str()).collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.ring.messages_at(Level::Warn)
    }
}

/// Compile `files` in the given submission order from an in-memory tree
pub fn run(config: CompilerConfig, files: &[(&str, &str)]) -> Outcome {
    run_with_sourcepath(config, files, &[], &[])
}

/// Like `run`, with extra files reachable only through `sourcepath`
pub fn run_with_sourcepath(
    config: CompilerConfig,
    files: &[(&str, &str)],
    library: &[(&str, &str)],
    sourcepath: &[&str],
) -> Outcome {
    let fs = MemoryFileSystem::new();
    for (path, text) in files.iter().chain(library) {
        fs.insert(path, *text);
    }
    let (logger, ring) = LogConfig::test().init();
    let ring = ring.expect("test config keeps a ring buffer");
    let run_config = RunConfig::new(config)
        .with_sourcepath(sourcepath.iter().copied())
        .with_logger(logger);

    let paths: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
    let output = compile_batch(Arc::new(fs), &paths, &run_config).expect("batch run");
    Outcome { output, ring }
}
