//! Batch run output

use strata_core::{CompilationResult, DeclarationTree, Diagnostic};

/// Everything a finished batch produced
#[derive(Debug)]
pub struct BatchOutput {
    /// Trees in final processing order, including units found on demand
    pub trees: Vec<DeclarationTree>,
    /// Results in the order the driver emitted them
    pub results: Vec<CompilationResult>,
    /// Units that went through the pipeline
    pub units: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl BatchOutput {
    pub fn has_errors(&self) -> bool {
        self.errors > 0 || self.results.iter().any(CompilationResult::has_errors)
    }

    /// Every recorded diagnostic with the file it belongs to
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.results
            .iter()
            .flat_map(|r| r.diagnostics().iter().map(move |d| (r.file_name.as_str(), d)))
    }

    pub fn tree(&self, file_name: &str) -> Option<&DeclarationTree> {
        self.trees.iter().find(|t| t.file_name() == file_name)
    }
}
