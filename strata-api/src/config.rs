//! API layer configuration

use std::path::PathBuf;
use std::sync::Arc;
use strata_config::{CompilerConfig, LogLevel};
use strata_log::{Level, Logger};

/// Configuration of one batch run
#[derive(Clone)]
pub struct RunConfig {
    /// Compiler mode flags
    pub compiler: CompilerConfig,
    /// Roots searched for units referenced but not part of the batch
    pub sourcepath: Vec<PathBuf>,
    pub logger: Arc<Logger>,
}

impl RunConfig {
    pub fn new(compiler: CompilerConfig) -> Self {
        Self {
            compiler,
            ..Self::default()
        }
    }

    pub fn with_sourcepath<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sourcepath = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Print driver logs to stdout at the compiler's diagnostic level
    pub fn with_console_logging(self) -> Self {
        let logger = match log_level(self.compiler.diagnostic_level) {
            Some(level) => strata_log::LogConfig::new(level).with_stdout().init().0,
            None => Logger::noop(),
        };
        self.with_logger(logger)
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("compiler", &self.compiler)
            .field("sourcepath", &self.sourcepath)
            .finish()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            sourcepath: Vec::new(),
            logger: Logger::noop(),
        }
    }
}

/// Logger level matching a configured diagnostic level; `None` turns logging off
pub fn log_level(level: LogLevel) -> Option<Level> {
    match level {
        LogLevel::Off => None,
        LogLevel::Error => Some(Level::Error),
        LogLevel::Warn => Some(Level::Warn),
        LogLevel::Info => Some(Level::Info),
        LogLevel::Debug => Some(Level::Debug),
        LogLevel::Trace => Some(Level::Trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let cfg = RunConfig::default();
        assert!(!cfg.compiler.tolerant);
        assert!(cfg.sourcepath.is_empty());
        assert_eq!(cfg.compiler.max_problems_per_unit, 100);
    }

    #[test]
    fn test_builder() {
        let cfg = RunConfig::new(CompilerConfig::tolerant()).with_sourcepath(["/lib", "/vendor"]);
        assert!(cfg.compiler.tolerant);
        assert_eq!(cfg.sourcepath, vec![PathBuf::from("/lib"), PathBuf::from("/vendor")]);
    }

    #[test]
    fn test_run_config_debug() {
        let debug_str = format!("{:?}", RunConfig::default());
        assert!(debug_str.contains("compiler"));
        assert!(debug_str.contains("sourcepath"));
    }

    #[test]
    fn test_console_logging_follows_level() {
        let mut compiler = CompilerConfig::default();
        compiler.diagnostic_level = LogLevel::Debug;
        let cfg = RunConfig::new(compiler).with_console_logging();
        assert_eq!(cfg.logger.level(), Level::Debug);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(LogLevel::Off), None);
        assert_eq!(log_level(LogLevel::Warn), Some(Level::Warn));
        assert_eq!(log_level(LogLevel::Trace), Some(Level::Trace));
    }
}
