//! Coarse progress events

use std::sync::Arc;
use strata_log::{info, Logger};

use super::DRIVER_TARGET;

/// Observer of driver progress; it cannot influence the run
pub trait ProgressReporter {
    /// `done` units are finished; `label` describes what happens next
    fn report(&mut self, done: usize, label: &str);
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _done: usize, _label: &str) {}
}

/// Writes each event to a logger at info level
#[derive(Debug, Clone)]
pub struct LogProgress {
    logger: Arc<Logger>,
}

impl LogProgress {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, done: usize, label: &str) {
        info!(self.logger, target: DRIVER_TARGET, "[{}] {}", done, label);
    }
}

/// Remembers every event
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub events: Vec<(usize, String)>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.events.iter().map(|(_, label)| label.as_str()).collect()
    }

    /// Last completed count reported
    pub fn last_done(&self) -> Option<usize> {
        self.events.last().map(|(done, _)| *done)
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&mut self, done: usize, label: &str) {
        self.events.push((done, label.to_string()));
    }
}
