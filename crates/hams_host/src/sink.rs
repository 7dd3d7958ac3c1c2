//! Destinations for records received from the native library.

use hams_abi::{Level, LevelFilter, LogEntry, LogMetadata};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Receives decoded records.
///
/// Implementations may be called from any native thread, concurrently, and
/// must not keep thread-local state between calls.
pub trait LogSink: Send + Sync {
    /// Pre-filter called before a record is built. Defaults to accepting.
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        let _ = metadata;
        true
    }

    /// Receives one accepted record.
    fn log(&self, entry: &LogEntry);

    /// Makes buffered output durable.
    fn flush(&self) {}
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        (**self).enabled(metadata)
    }

    fn log(&self, entry: &LogEntry) {
        (**self).log(entry);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        (**self).enabled(metadata)
    }

    fn log(&self, entry: &LogEntry) {
        (**self).log(entry);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

/// Re-emits records as `tracing` events in the calling process.
///
/// Use only with a library loaded from disk: a statically linked library
/// shares this process's global subscriber, so its events would come back
/// through the same sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    filter: LevelFilter,
}

impl TracingSink {
    /// Creates a sink passing records up to `filter`.
    pub fn new(filter: LevelFilter) -> Self {
        Self { filter }
    }
}

impl LogSink for TracingSink {
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        self.filter.allows(metadata.level)
    }

    fn log(&self, entry: &LogEntry) {
        let target = entry.target.as_str();
        let file = entry.file.as_deref().unwrap_or("");
        let line = entry.line.unwrap_or(0);
        match entry.level {
            Level::Error => error!(native_target = target, file, line, "{}", entry.message),
            Level::Warn => warn!(native_target = target, file, line, "{}", entry.message),
            Level::Info => info!(native_target = target, file, line, "{}", entry.message),
            Level::Debug => debug!(native_target = target, file, line, "{}", entry.message),
            Level::Trace => trace!(native_target = target, file, line, "{}", entry.message),
        }
    }
}

/// Writes each record as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    filter: LevelFilter,
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W, filter: LevelFilter) -> Self {
        Self {
            filter,
            writer: Mutex::new(writer),
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_entry(&self, entry: &LogEntry) -> io::Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, entry)?;
        writer.write_all(b"\n")
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>, filter: LevelFilter) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), filter))
    }
}

impl<W: Write + Send> LogSink for JsonLinesSink<W> {
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        self.filter.allows(metadata.level)
    }

    fn log(&self, entry: &LogEntry) {
        // Output errors cannot be reported back across the callback.
        let _ = self.write_entry(entry);
    }

    fn flush(&self) {
        let _ = self.writer.lock().flush();
    }
}
