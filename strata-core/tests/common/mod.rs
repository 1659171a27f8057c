//! Test helpers for driving batches

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use strata_core::driver::{CollectingSink, Compiler, RecordingProgress};
use strata_core::lookup::{LookupEnvironment, ProviderError};
use strata_core::{CompilerConfig, DeclarationTree, EnvironmentError, SourceUnit};
use strata_log::{Level, LogRingBuffer, Logger};

pub fn units(sources: &[(&str, &str)]) -> Vec<SourceUnit> {
    sources.iter().map(|(name, text)| SourceUnit::new(*name, *text)).collect()
}

/// Logger at `Warn` capturing into a ring buffer
pub fn capture_logger() -> (Arc<Logger>, Arc<LogRingBuffer>) {
    let ring = LogRingBuffer::new(256);
    let logger = Logger::new(Level::Warn).with_sink(ring.clone());
    (logger, ring)
}

/// Outcome of one batch run
pub struct Run {
    pub trees: Vec<DeclarationTree>,
    pub sink: CollectingSink,
    pub progress: RecordingProgress,
    pub env: LookupEnvironment,
}

impl Run {
    pub fn names(&self) -> Vec<&str> {
        self.trees.iter().map(|t| t.file_name()).collect()
    }

    pub fn messages(&self, file: &str) -> Vec<String> {
        self.trees
            .iter()
            .find(|t| t.file_name() == file)
            .map(|t| t.result.diagnostics().iter().map(|d| d.message.clone()).collect())
            .unwrap_or_default()
    }

    pub fn emitted(&self) -> Vec<&str> {
        self.sink.results().iter().map(|r| r.file_name.as_str()).collect()
    }
}

pub fn try_compile_with(
    config: CompilerConfig,
    env: LookupEnvironment,
    sources: &[(&str, &str)],
) -> Result<Run, EnvironmentError> {
    let mut compiler = Compiler::new(config, env, CollectingSink::new()).with_progress(RecordingProgress::new());
    let trees = compiler.build_units(units(sources))?;
    let (env, sink, progress) = compiler.into_parts();
    Ok(Run {
        trees,
        sink,
        progress,
        env,
    })
}

pub fn compile_with(config: CompilerConfig, logger: Arc<Logger>, sources: &[(&str, &str)]) -> Run {
    let env = LookupEnvironment::new(&config, logger);
    try_compile_with(config, env, sources).expect("batch run failed")
}

pub fn compile(sources: &[(&str, &str)]) -> Run {
    compile_with(CompilerConfig::default(), Logger::noop(), sources)
}

/// In-memory unit provider keyed by qualified type name, recording every lookup
#[derive(Clone, Default)]
pub struct LibraryProvider {
    units: Rc<HashMap<String, SourceUnit>>,
    pub requests: Rc<RefCell<Vec<String>>>,
}

impl LibraryProvider {
    pub fn new(entries: &[(&str, &str, &str)]) -> Self {
        let units = entries
            .iter()
            .map(|(qualified, file, text)| (qualified.to_string(), SourceUnit::new(*file, *text)))
            .collect();
        Self {
            units: Rc::new(units),
            requests: Rc::default(),
        }
    }

    pub fn lookup(&self, qualified: &str) -> Result<Option<SourceUnit>, ProviderError> {
        self.requests.borrow_mut().push(qualified.to_string());
        Ok(self.units.get(qualified).cloned())
    }
}
