//! Diagnostic output

use serde::Serialize;
use std::io::{self, Write};
use strata_api::{BatchOutput, Diagnostic};

/// One diagnostic as emitted in JSON mode
#[derive(Debug, Serialize)]
pub struct DiagnosticLine<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub severity: &'static str,
    pub category: &'static str,
    pub message: &'a str,
}

impl<'a> DiagnosticLine<'a> {
    pub fn new(file: &'a str, diagnostic: &'a Diagnostic) -> Self {
        Self {
            file,
            line: diagnostic.line,
            column: diagnostic.column,
            severity: diagnostic.severity.as_str(),
            category: diagnostic.category.as_str(),
            message: &diagnostic.message,
        }
    }
}

/// `file:line:col: severity: [category] message`
pub fn format_diagnostic(file: &str, diagnostic: &Diagnostic) -> String {
    format!(
        "{file}:{}:{}: {}: [{}] {}",
        diagnostic.line,
        diagnostic.column,
        diagnostic.severity.as_str(),
        diagnostic.category.as_str(),
        diagnostic.message
    )
}

/// Write every diagnostic plus a summary line
pub fn write_report(out: &mut impl Write, output: &BatchOutput, json: bool) -> io::Result<()> {
    for (file, diagnostic) in output.diagnostics() {
        if json {
            let line = serde_json::to_string(&DiagnosticLine::new(file, diagnostic)).map_err(io::Error::other)?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{}", format_diagnostic(file, diagnostic))?;
        }
    }
    if !json {
        writeln!(
            out,
            "{} units compiled: {} errors, {} warnings",
            output.units, output.errors, output.warnings
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_api::{compile_batch, MemoryFileSystem, RunConfig};
    use std::sync::Arc;

    fn output() -> BatchOutput {
        let fs = MemoryFileSystem::new();
        fs.insert("src/A.strata", "class A {\n  int f() { return b; }\n}");
        compile_batch(Arc::new(fs), &["src/A.strata"], &RunConfig::default()).unwrap()
    }

    #[test]
    fn test_text_report() {
        let mut buf = Vec::new();
        write_report(&mut buf, &output(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("src/A.strata:2:"), "{}", lines[0]);
        assert!(lines[0].ends_with(": error: [resolution] b cannot be resolved to a variable"));
        assert_eq!(lines[1], "1 units compiled: 1 errors, 0 warnings");
    }

    #[test]
    fn test_json_report() {
        let mut buf = Vec::new();
        write_report(&mut buf, &output(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["file"], "src/A.strata");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["category"], "resolution");
        assert_eq!(value["line"], 2);
    }
}
