//! Strata Core - front end, lookup environment and batch driver
//!
//! Parses units, binds their declarations into a shared lookup environment and
//! drives every unit through fault-in, verification, resolution and flow
//! analysis. Works on in-memory units only; loading files is left to callers.
//!
//! Configuration and the logger are passed explicitly, never read from global state.

pub mod compiler;
pub mod driver;
pub mod lookup;

// Re-export common types
pub use compiler::{Category, CompilationResult, DeclarationTree, Diagnostic, Severity, SourceUnit, TreeState};
pub use driver::{CollectingSink, Compiler, ProgressReporter, ResultSink};
pub use lookup::{EnvironmentError, LookupEnvironment, ProviderError, UnitProvider};

// Re-export config types from strata-config
pub use strata_config::{CompilerConfig, LogLevel, Phase};
