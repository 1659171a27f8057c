//! One-call logger setup

use crate::{Level, LogRingBuffer, Logger};
use std::sync::Arc;

/// Where records go
#[derive(Clone, Debug, PartialEq)]
pub enum OutputConfig {
    #[cfg(feature = "stdout")]
    Stdout,
    /// Append to a file (path)
    #[cfg(feature = "file")]
    File(String),
    /// Forward into the active `tracing` subscriber
    #[cfg(feature = "tracing")]
    Tracing,
    /// Keep the last N records in memory
    RingBuffer(usize),
}

/// Logger configuration
///
/// ```
/// use strata_log::{LogConfig, Level};
///
/// let (logger, ring) = LogConfig::new(Level::Debug).with_ring_buffer(1000).init();
/// assert!(ring.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: Level,
    pub outputs: Vec<OutputConfig>,
}

impl LogConfig {
    /// Configuration at `level` with no outputs
    pub fn new(level: Level) -> Self {
        LogConfig {
            level,
            outputs: Vec::new(),
        }
    }

    /// Silent except for a ring buffer that captures warnings and errors
    pub fn test() -> Self {
        LogConfig {
            level: Level::Warn,
            outputs: vec![OutputConfig::RingBuffer(1000)],
        }
    }

    #[cfg(feature = "stdout")]
    pub fn with_stdout(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Stdout) {
            self.outputs.push(OutputConfig::Stdout);
        }
        self
    }

    #[cfg(feature = "file")]
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.outputs.push(OutputConfig::File(path.into()));
        self
    }

    #[cfg(feature = "tracing")]
    pub fn with_tracing(mut self) -> Self {
        if !self.outputs.contains(&OutputConfig::Tracing) {
            self.outputs.push(OutputConfig::Tracing);
        }
        self
    }

    pub fn with_ring_buffer(mut self, capacity: usize) -> Self {
        self.outputs.push(OutputConfig::RingBuffer(capacity));
        self
    }

    /// Build the logger; the last configured ring buffer is returned for inspection
    pub fn init(self) -> (Arc<Logger>, Option<Arc<LogRingBuffer>>) {
        let logger = Logger::new(self.level);
        let mut ring_buffer = None;

        for output in self.outputs {
            match output {
                #[cfg(feature = "stdout")]
                OutputConfig::Stdout => logger.add_sink(crate::StdoutSink),
                #[cfg(feature = "file")]
                OutputConfig::File(path) => {
                    // An unopenable log file only loses the file output.
                    if let Ok(sink) = crate::FileSink::new(&path) {
                        logger.add_sink(sink);
                    }
                }
                #[cfg(feature = "tracing")]
                OutputConfig::Tracing => logger.add_sink(crate::TracingSink),
                OutputConfig::RingBuffer(capacity) => {
                    let ring = LogRingBuffer::new(capacity);
                    ring_buffer = Some(Arc::clone(&ring));
                    logger.add_sink(ring);
                }
            }
        }

        (logger, ring_buffer)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_captures_into_ring() {
        let (logger, ring) = LogConfig::test().init();
        let ring = ring.unwrap();

        logger.log(Level::Info, "test", "filtered");
        logger.log(Level::Warn, "test", "kept");

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.dump_records()[0].message, "kept");
    }

    #[test]
    fn test_config_without_ring() {
        let (logger, ring) = LogConfig::new(Level::Error).init();
        assert!(ring.is_none());
        assert_eq!(logger.level(), Level::Error);
    }

    #[cfg(feature = "stdout")]
    #[test]
    fn test_with_stdout_is_idempotent() {
        let config = LogConfig::new(Level::Info).with_stdout().with_stdout();
        assert_eq!(config.outputs.len(), 1);
    }
}
