//! CLI configuration
//!
//! Manifest loading and the per-phase log levels handed to the subscriber.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_config::{LogLevel, Phase, ProjectManifest};
use strata_log::{Level, Logger};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("'{}' not found\n\nThe current directory is not a Strata project.\nHint: create '{}' listing the batch in its 'sources' field", .0.display(), .0.display())]
    Missing(PathBuf),

    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'sources' in '{}' cannot be empty", .0.display())]
    NoSources(PathBuf),
}

/// Read and validate a project manifest
pub fn read_manifest(path: &Path) -> Result<ProjectManifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::Missing(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(path, &content)
}

pub fn parse_manifest(path: &Path, content: &str) -> Result<ProjectManifest, ManifestError> {
    let manifest: ProjectManifest = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if manifest.sources.is_empty() {
        return Err(ManifestError::NoSources(path.to_path_buf()));
    }
    Ok(manifest)
}

/// Resolve a manifest entry relative to the manifest's directory
pub fn resolve_entry(manifest_path: &Path, entry: &str) -> PathBuf {
    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
    base_dir.join(entry)
}

/// CLI log configuration: a global level plus per-phase overrides
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: LevelFilter,
    pub phases: HashMap<Phase, LevelFilter>,
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            global: level_filter(level),
            phases: HashMap::new(),
        }
    }

    pub fn with_phase(mut self, phase: Phase, level: LevelFilter) -> Self {
        self.phases.insert(phase, level);
        self
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> LevelFilter {
        self.phases.get(&phase).copied().unwrap_or(self.global)
    }

    /// The most verbose level any target uses
    pub fn max_level(&self) -> LevelFilter {
        self.phases.values().copied().fold(self.global, LevelFilter::max)
    }
}

/// Phase named like its log target suffix (`parser`, `resolver`, ...)
pub fn parse_phase(name: &str) -> Result<Phase, String> {
    Phase::ALL
        .into_iter()
        .find(|phase| phase.as_str() == name)
        .ok_or_else(|| {
            let known: Vec<_> = Phase::ALL.iter().map(Phase::as_str).collect();
            format!("unknown phase '{name}', expected one of: {}", known.join(", "))
        })
}

pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// Library logger level matching a subscriber filter; `None` when everything is off
pub fn record_level(filter: LevelFilter) -> Option<Level> {
    let level = match filter.into_level()? {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        tracing::Level::DEBUG => Level::Debug,
        _ => Level::Trace,
    };
    Some(level)
}

/// Logger handed to the compiler: bridged into tracing, optionally appended to `log_file`
pub fn library_logger(filter: LevelFilter, log_file: Option<&Path>) -> Arc<Logger> {
    let Some(level) = record_level(filter) else {
        return Logger::noop();
    };
    let config = strata_log::LogConfig::new(level).with_tracing();
    match log_file {
        Some(path) => config.with_file(path.to_string_lossy()).init().0,
        None => config.init().0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = parse_manifest(
            Path::new("strata.json"),
            r#"{ "sources": ["src"], "sourcepath": ["lib"], "compiler": { "tolerant": true } }"#,
        )
        .unwrap();
        assert_eq!(manifest.sources, vec!["src"]);
        assert_eq!(manifest.sourcepath, vec!["lib"]);
        assert!(manifest.compiler_config().tolerant);
    }

    #[test]
    fn test_empty_sources_rejected() {
        let err = parse_manifest(Path::new("strata.json"), r#"{ "sources": [] }"#).unwrap_err();
        assert!(matches!(err, ManifestError::NoSources(_)));
    }

    #[test]
    fn test_malformed_manifest() {
        let err = parse_manifest(Path::new("strata.json"), "{ sources").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse 'strata.json'"));
    }

    #[test]
    fn test_missing_manifest() {
        let err = read_manifest(Path::new("/definitely/not/here/strata.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Missing(_)));
    }

    #[test]
    fn test_resolve_entry() {
        assert_eq!(
            resolve_entry(Path::new("proj/strata.json"), "src"),
            PathBuf::from("proj/src")
        );
        assert_eq!(resolve_entry(Path::new("strata.json"), "src"), PathBuf::from("src"));
    }

    #[test]
    fn test_level_for_phase() {
        let config = LogConfig::new(LogLevel::Warn).with_phase(Phase::Parse, LevelFilter::TRACE);
        assert_eq!(config.level_for(Phase::Parse), LevelFilter::TRACE);
        assert_eq!(config.level_for(Phase::Analyze), LevelFilter::WARN);
        assert_eq!(config.max_level(), LevelFilter::TRACE);
        assert_eq!(LogConfig::new(LogLevel::Off).global, LevelFilter::OFF);
    }

    #[test]
    fn test_record_level() {
        assert_eq!(record_level(LevelFilter::OFF), None);
        assert_eq!(record_level(LevelFilter::INFO), Some(Level::Info));
        assert_eq!(record_level(level_filter(LogLevel::Trace)), Some(Level::Trace));
    }

    #[test]
    fn test_parse_phase() {
        assert_eq!(parse_phase("fault_in"), Ok(Phase::FaultIn));
        assert!(parse_phase("lexer").unwrap_err().contains("parser, binder"));
    }

    #[test]
    fn test_library_logger_appends_to_log_file() {
        let path = std::env::temp_dir().join(format!("strata_cli_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = library_logger(LevelFilter::WARN, Some(&path));
        strata_log::warn!(logger, target: "strata::driver", "Syntax error detected in: {}", "Broken");
        strata_log::debug!(logger, target: "strata::driver", "not written");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Syntax error detected in: Broken"));
        assert!(!content.contains("not written"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_library_logger_off() {
        let logger = library_logger(LevelFilter::OFF, None);
        assert!(!logger.is_enabled(Level::Warn));
    }
}
