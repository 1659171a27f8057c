//! Batch compilation driver

pub mod compiler;
pub mod ordering;
pub mod prefilter;
pub mod progress;
pub mod sink;

pub use compiler::Compiler;
pub use ordering::order_units;
pub use prefilter::prefilter;
pub use progress::{LogProgress, NoProgress, ProgressReporter, RecordingProgress};
pub use sink::{CollectingSink, ResultSink};

/// Log target of the driver's own records
pub const DRIVER_TARGET: &str = "strata::driver";
