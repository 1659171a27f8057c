//! Logger implementation

use crate::record::{Level, Record};
use crate::span::{Span, SpanId};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Log output target
pub trait LogSink: Send + Sync {
    fn write(&self, record: &Record);
}

/// Logger configuration and state
pub struct Logger {
    level: AtomicU8,
    sinks: Mutex<Vec<Box<dyn LogSink>>>,
    span_stack: Mutex<Vec<Span>>,
    next_span_id: AtomicU64,
}

// A panicking sink must not disable logging for the rest of the run.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Logger {
    pub fn new(level: Level) -> Arc<Self> {
        Arc::new(Logger {
            level: AtomicU8::new(level as u8),
            sinks: Mutex::new(Vec::new()),
            span_stack: Mutex::new(Vec::new()),
            next_span_id: AtomicU64::new(1),
        })
    }

    pub fn with_sink<S: LogSink + 'static>(self: Arc<Self>, sink: S) -> Arc<Self> {
        self.add_sink(sink);
        self
    }

    pub fn add_sink<S: LogSink + 'static>(&self, sink: S) {
        lock(&self.sinks).push(Box::new(sink));
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Write a record to every sink (prefer the macros, which format lazily)
    #[inline(never)]
    pub fn log(&self, level: Level, target: &'static str, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        let mut record = Record::new(level, target, message);
        if let Some(span) = lock(&self.span_stack).last() {
            record = record.with_span(span.id.0);
        }

        for sink in lock(&self.sinks).iter() {
            sink.write(&record);
        }
    }

    /// Enter a named span; it is popped when the guard drops
    pub fn enter_span(self: &Arc<Self>, name: &'static str) -> SpanGuard {
        let id = SpanId(self.next_span_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.span_stack).push(Span::new(id, name));

        SpanGuard {
            logger: Arc::clone(self),
            id,
        }
    }

    /// Name of the innermost active span
    pub fn current_span(&self) -> Option<&'static str> {
        lock(&self.span_stack).last().map(|span| span.name)
    }

    pub fn span_depth(&self) -> usize {
        lock(&self.span_stack).len()
    }

    /// Logger with no sinks, for callers that do not care about logs
    pub fn noop() -> Arc<Self> {
        Self::new(Level::Error)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("sinks", &lock(&self.sinks).len())
            .field("span_depth", &self.span_depth())
            .finish()
    }
}

/// Pops its span when dropped
pub struct SpanGuard {
    logger: Arc<Logger>,
    id: SpanId,
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        let mut stack = lock(&self.logger.span_stack);
        if let Some(pos) = stack.iter().rposition(|span| span.id == self.id) {
            stack.remove(pos);
        }
    }
}

/// Chained loggers: one logger can be a sink of another
impl LogSink for Arc<Logger> {
    fn write(&self, record: &Record) {
        self.log(record.level, record.target, record.message.clone());
    }
}

#[cfg(feature = "stdout")]
pub struct StdoutSink;

#[cfg(feature = "stdout")]
impl LogSink for StdoutSink {
    fn write(&self, record: &Record) {
        println!("{}", record.format());
    }
}

/// Appends formatted records to a file
#[cfg(feature = "file")]
pub struct FileSink {
    file: Mutex<std::fs::File>,
}

#[cfg(feature = "file")]
impl FileSink {
    pub fn new(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Ok(FileSink {
            file: Mutex::new(file),
        })
    }
}

#[cfg(feature = "file")]
impl LogSink for FileSink {
    fn write(&self, record: &Record) {
        use std::io::Write;
        let mut file = lock(&self.file);
        let _ = writeln!(file, "{}", record.format());
    }
}
