//! strata-log - structured logging for the Strata compiler
//!
//! - **Explicit passing**: there is no global logger; an `Arc<Logger>` is
//!   handed to whatever needs to log.
//! - **Lazy formatting**: the macros check the level before formatting.
//! - **Capture**: `LogRingBuffer` keeps the last N records, which is how tests
//!   observe warnings such as discarded units.
//! - **Bridging**: with the `tracing` feature, `TracingSink` forwards records
//!   into a `tracing` subscriber.
//!
//! # Quick start
//!
//! ```ignore
//! use strata_log::{LogConfig, warn};
//!
//! let (logger, ring) = LogConfig::test().init();
//! warn!(logger, "Syntax error detected in: {}", "src/Broken.strata");
//! ```

mod config;
mod logger;
mod macros;
mod record;
mod ring_buffer;
mod span;

#[cfg(feature = "tracing")]
mod tracing_sink;

pub use config::{LogConfig, OutputConfig};
pub use logger::{LogSink, Logger, SpanGuard};
pub use record::{Level, Record};
pub use ring_buffer::{LogRingBuffer, RingBufferStats};
pub use span::{Span, SpanId};

#[cfg(feature = "file")]
pub use logger::FileSink;
#[cfg(feature = "stdout")]
pub use logger::StdoutSink;
#[cfg(feature = "tracing")]
pub use tracing_sink::TracingSink;

/// Result type for logging setup
pub type Result<T> = std::result::Result<T, Error>;

/// Logging setup error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A sink could not be opened
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The requested output is not compiled in
    #[error("Output not supported by this build: {0}")]
    Unsupported(&'static str),
}
