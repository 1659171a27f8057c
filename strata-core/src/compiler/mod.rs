//! Front end: units, syntax trees, parsing and per-unit results

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod result;
pub mod tree;
pub mod unit;

pub use result::{Category, CompilationResult, Diagnostic, Severity};
pub use tree::{DeclarationTree, TreeState, UnitScope};
pub use unit::SourceUnit;
