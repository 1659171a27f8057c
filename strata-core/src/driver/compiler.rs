//! Phase driver

use super::ordering::order_units;
use super::prefilter::prefilter;
use super::progress::{NoProgress, ProgressReporter};
use super::sink::ResultSink;
use super::DRIVER_TARGET;
use crate::compiler::{DeclarationTree, SourceUnit};
use crate::lookup::{fault_in_unit, EnvironmentError, FlowAnalyzer, LookupEnvironment, Resolver};
use std::sync::Arc;
use strata_config::CompilerConfig;
use strata_log::{debug, info, Logger};

/// Runs a batch of units through bind, fault-in, verify, resolve and analyze
///
/// The driver walks the environment's processing list by position and re-reads
/// its length on every step, so units the environment discovers while the
/// batch is running are processed in the same run.
pub struct Compiler<S, P = NoProgress> {
    config: CompilerConfig,
    env: LookupEnvironment,
    sink: S,
    progress: P,
    logger: Arc<Logger>,
}

impl<S: ResultSink> Compiler<S> {
    pub fn new(config: CompilerConfig, env: LookupEnvironment, sink: S) -> Self {
        let logger = env.logger().clone();
        Self {
            config,
            env,
            sink,
            progress: NoProgress,
            logger,
        }
    }
}

impl<S: ResultSink, P: ProgressReporter> Compiler<S, P> {
    pub fn with_progress<Q: ProgressReporter>(self, progress: Q) -> Compiler<S, Q> {
        Compiler {
            config: self.config,
            env: self.env,
            sink: self.sink,
            progress,
            logger: self.logger,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn environment(&self) -> &LookupEnvironment {
        &self.env
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn into_parts(self) -> (LookupEnvironment, S, P) {
        (self.env, self.sink, self.progress)
    }

    /// Compile `units` and return every tree of the processing list
    ///
    /// Per-unit problems end up in each tree's result and never stop the run.
    /// Only a fatal environment error does, and then no trees are returned.
    pub fn build_units(&mut self, units: Vec<SourceUnit>) -> Result<Vec<DeclarationTree>, EnvironmentError> {
        let _span = self.logger.enter_span("build_units");
        self.progress.report(0, "beginning to compile");

        let mut units = order_units(units);
        if self.config.filters_syntax_errors() {
            units = prefilter(
                units,
                self.env.parser_mut(),
                self.config.max_problems_per_unit,
                &self.logger,
            );
        }

        let first = self.env.processing_len();
        let submitted = units.len();
        info!(self.logger, target: DRIVER_TARGET, "compiling {} units", submitted);
        self.env.register_units(units);

        let mut i = first;
        while i < self.env.processing_len() {
            let mut tree = self.env.take_unit(i)?;
            let done = i - first;
            self.progress.report(done, &format!("processing {}", tree.file_name()));

            self.process(&mut tree)?;
            self.sink.accept(&tree.result);

            self.env.restore_unit(i, tree)?;
            self.progress.report(done + 1, "unit completed");
            i += 1;
        }

        let trees = self.env.take_trees();
        info!(
            self.logger,
            target: DRIVER_TARGET,
            "compiled {} units, {} found on demand",
            trees.len(),
            trees.len().saturating_sub(submitted)
        );
        Ok(trees)
    }

    fn process(&mut self, tree: &mut DeclarationTree) -> Result<(), EnvironmentError> {
        self.env.parser_mut().materialize_bodies(tree);

        if tree.has_scope() {
            fault_in_unit(&mut self.env, tree)?;
            self.env.method_verifier().verify(tree);
        }

        Resolver::new(&mut self.env).resolve_unit(tree)?;
        FlowAnalyzer::new().analyze(tree);
        tree.needs_investigation = false;

        debug!(
            self.logger,
            target: DRIVER_TARGET,
            "{}: {} problems",
            tree.file_name(),
            tree.result.diagnostics().len()
        );
        Ok(())
    }
}
