//! Per-unit diagnostics

use crate::compiler::lexer::Coordinate;
use crate::compiler::parser::ParserError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Which pipeline step reported a problem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Syntax,
    Binding,
    Verification,
    Resolution,
    Flow,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::Binding => "binding",
            Category::Verification => "verification",
            Category::Resolution => "resolution",
            Category::Flow => "flow",
        }
    }
}

/// A single problem attached to a unit
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    pub fn error(category: Category, message: impl Into<String>, at: Coordinate) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            line: at.line,
            column: at.column,
        }
    }

    pub fn warning(category: Category, message: impl Into<String>, at: Coordinate) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, message, at)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<ParserError> for Diagnostic {
    fn from(err: ParserError) -> Self {
        Diagnostic {
            severity: Severity::Error,
            category: Category::Syntax,
            line: err.line().unwrap_or(0),
            column: err.column().unwrap_or(0),
            message: err.kind.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: [{}] {}",
            self.line,
            self.column,
            self.severity.as_str(),
            self.category.as_str(),
            self.message
        )
    }
}

/// Diagnostics gathered for one unit, plus its position in the batch
///
/// Created fresh whenever a unit is parsed and never shared between units.
/// Past `max_problems` further problems are counted but not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct CompilationResult {
    pub file_name: String,
    pub unit_index: usize,
    pub total_units: usize,
    diagnostics: Vec<Diagnostic>,
    max_problems: usize,
    suppressed: usize,
    suppressed_errors: bool,
}

impl CompilationResult {
    pub fn new(
        file_name: impl Into<String>,
        unit_index: usize,
        total_units: usize,
        max_problems: usize,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            unit_index,
            total_units,
            diagnostics: Vec::new(),
            max_problems,
            suppressed: 0,
            suppressed_errors: false,
        }
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        if self.diagnostics.len() >= self.max_problems {
            self.suppressed += 1;
            self.suppressed_errors |= diagnostic.is_error();
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, category: Category, message: impl Into<String>, at: Coordinate) {
        self.record(Diagnostic::error(category, message, at));
    }

    pub fn warning(&mut self, category: Category, message: impl Into<String>, at: Coordinate) {
        self.record(Diagnostic::warning(category, message, at));
    }

    pub fn has_errors(&self) -> bool {
        self.suppressed_errors || self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_errors_in(&self, category: Category) -> bool {
        self.errors().any(|d| d.category == category)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Problems dropped because the per-unit cap was reached
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize) -> Coordinate {
        Coordinate { line, column }
    }

    #[test]
    fn test_errors_and_warnings() {
        let mut result = CompilationResult::new("A.strata", 0, 1, 10);
        assert!(!result.has_errors());

        result.warning(Category::Binding, "The import a.B is repeated", at(2, 1));
        assert!(!result.has_errors());

        result.error(Category::Resolution, "x cannot be resolved to a variable", at(5, 9));
        assert!(result.has_errors());
        assert!(result.has_errors_in(Category::Resolution));
        assert!(!result.has_errors_in(Category::Syntax));
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.warnings().count(), 1);
    }

    #[test]
    fn test_problem_cap_keeps_error_flag() {
        let mut result = CompilationResult::new("A.strata", 0, 1, 1);
        result.warning(Category::Binding, "first", at(1, 1));
        result.error(Category::Flow, "second", at(2, 1));

        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.suppressed_count(), 1);
        assert!(result.has_errors());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(Category::Syntax, "Unexpected token '}'", at(3, 7));
        assert_eq!(diag.to_string(), "3:7: error: [syntax] Unexpected token '}'");
    }
}
