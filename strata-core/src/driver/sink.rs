//! Where finished units are delivered

use crate::compiler::CompilationResult;

/// Receives each unit's result once, in processing order
pub trait ResultSink {
    fn accept(&mut self, result: &CompilationResult);
}

impl<F> ResultSink for F
where
    F: FnMut(&CompilationResult),
{
    fn accept(&mut self, result: &CompilationResult) {
        self(result)
    }
}

/// Keeps a copy of every accepted result
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    results: Vec<CompilationResult>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[CompilationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<CompilationResult> {
        self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.errors().count()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|r| r.warnings().count()).sum()
    }
}

impl ResultSink for CollectingSink {
    fn accept(&mut self, result: &CompilationResult) {
        self.results.push(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::Coordinate;
    use crate::compiler::Category;

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        let mut first = CompilationResult::new("A.strata", 0, 2, 10);
        first.error(Category::Flow, "Unreachable code", Coordinate { line: 3, column: 9 });
        let mut second = CompilationResult::new("B.strata", 1, 2, 10);
        second.warning(Category::Binding, "The import a.B is repeated", Coordinate::default());

        sink.accept(&first);
        sink.accept(&second);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.results()[1].file_name, "B.strata");
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |result: &CompilationResult| seen.push(result.file_name.clone());
            sink.accept(&CompilationResult::new("A.strata", 0, 1, 10));
        }
        assert_eq!(seen, vec!["A.strata".to_string()]);
    }
}
