//! Strata Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Strata crates.

use serde::Deserialize;

/// Diagnostic/log verbosity, ordered from most restrictive to most permissive
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Get the string name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse a level name (case-insensitive). "silent" is accepted as `Off`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "silent" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Whether this level lets through more than `other` does
    pub fn is_more_permissive_than(&self, other: LogLevel) -> bool {
        *self > other
    }
}

/// Configuration for one batch compilation run
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    /// Discard syntactically invalid units before deep processing
    pub tolerant: bool,
    /// Diagnostic threshold; anything more permissive than `Error` forces tolerant filtering
    pub diagnostic_level: LogLevel,
    /// Problems recorded per unit before further ones are only counted
    pub max_problems_per_unit: usize,
}

impl CompilerConfig {
    /// Strict configuration: every unit goes through the full pipeline
    pub fn strict() -> Self {
        Self::default()
    }

    /// Tolerant configuration: units with syntax errors are dropped up front
    pub fn tolerant() -> Self {
        Self {
            tolerant: true,
            ..Self::default()
        }
    }

    /// Whether the syntax prefilter runs for this configuration
    pub fn filters_syntax_errors(&self) -> bool {
        self.tolerant || self.diagnostic_level.is_more_permissive_than(LogLevel::Error)
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            tolerant: false,
            diagnostic_level: LogLevel::Error,
            max_problems_per_unit: 100,
        }
    }
}

/// Pipeline phase enum for phase-specific configuration and log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Parse,
    Bind,
    FaultIn,
    Verify,
    Resolve,
    Analyze,
}

impl Phase {
    /// All phases in pipeline order
    pub const ALL: [Phase; 6] = [
        Phase::Parse,
        Phase::Bind,
        Phase::FaultIn,
        Phase::Verify,
        Phase::Resolve,
        Phase::Analyze,
    ];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Parse => "parser",
            Phase::Bind => "binder",
            Phase::FaultIn => "fault_in",
            Phase::Verify => "verifier",
            Phase::Resolve => "resolver",
            Phase::Analyze => "flow",
        }
    }

    /// Log target used for records emitted by this phase
    pub fn target(&self) -> &'static str {
        match self {
            Phase::Parse => "strata::parser",
            Phase::Bind => "strata::binder",
            Phase::FaultIn => "strata::fault_in",
            Phase::Verify => "strata::verifier",
            Phase::Resolve => "strata::resolver",
            Phase::Analyze => "strata::flow",
        }
    }
}

/// `compiler` section of a project manifest
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestCompiler {
    pub tolerant: Option<bool>,
    pub log_level: Option<String>,
    pub max_problems_per_unit: Option<usize>,
}

/// Project manifest (`strata.json`)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectManifest {
    /// Source files or directories, relative to the manifest
    pub sources: Vec<String>,
    /// Roots searched for units that are referenced but not in the batch
    #[serde(default)]
    pub sourcepath: Vec<String>,
    pub compiler: Option<ManifestCompiler>,
}

impl ProjectManifest {
    /// Build the compiler configuration described by the manifest
    pub fn compiler_config(&self) -> CompilerConfig {
        let defaults = CompilerConfig::default();
        let section = self.compiler.clone().unwrap_or_default();
        CompilerConfig {
            tolerant: section.tolerant.unwrap_or(defaults.tolerant),
            diagnostic_level: section
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(defaults.diagnostic_level),
            max_problems_per_unit: section
                .max_problems_per_unit
                .unwrap_or(defaults.max_problems_per_unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiler_config() {
        let cfg = CompilerConfig::default();
        assert!(!cfg.tolerant);
        assert_eq!(cfg.diagnostic_level, LogLevel::Error);
        assert_eq!(cfg.max_problems_per_unit, 100);
        assert!(!cfg.filters_syntax_errors());
    }

    #[test]
    fn test_tolerant_filters() {
        assert!(CompilerConfig::tolerant().filters_syntax_errors());
    }

    #[test]
    fn test_permissive_level_forces_filtering() {
        let cfg = CompilerConfig {
            diagnostic_level: LogLevel::Warn,
            ..CompilerConfig::strict()
        };
        assert!(cfg.filters_syntax_errors());

        let quiet = CompilerConfig {
            diagnostic_level: LogLevel::Off,
            ..CompilerConfig::strict()
        };
        assert!(!quiet.filters_syntax_errors());
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("silent"), Some(LogLevel::Off));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!(LogLevel::Trace.is_more_permissive_than(LogLevel::Debug));
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Parse.as_str(), "parser");
        assert_eq!(Phase::Analyze.target(), "strata::flow");
        assert_eq!(Phase::ALL.len(), 6);
    }

    #[test]
    fn test_manifest_deserialize() {
        let manifest: ProjectManifest = serde_json::from_str(
            r#"{
                "sources": ["src"],
                "compiler": { "tolerant": true, "log_level": "info" }
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.sources, vec!["src".to_string()]);
        assert!(manifest.sourcepath.is_empty());

        let cfg = manifest.compiler_config();
        assert!(cfg.tolerant);
        assert_eq!(cfg.diagnostic_level, LogLevel::Info);
        assert_eq!(cfg.max_problems_per_unit, 100);
    }

    #[test]
    fn test_manifest_without_compiler_section() {
        let manifest: ProjectManifest =
            serde_json::from_str(r#"{ "sources": ["a.strata"], "sourcepath": ["lib"] }"#).unwrap();
        assert_eq!(manifest.compiler_config(), CompilerConfig::default());
        assert_eq!(manifest.sourcepath, vec!["lib".to_string()]);
    }
}
