//! Capturing sinks.
//!
//! [`CaptureSink`] journals every callback in arrival order so tests can
//! check both what was logged and in which order `enabled` and `log` ran.

use hams_abi::{LogEntry, LogMetadata};
use hams_host::LogSink;
use parking_lot::Mutex;
use std::collections::BTreeSet;

/// One callback as seen by a [`CaptureSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `enabled` was asked and answered `accepted`.
    Enabled {
        /// Metadata received.
        metadata: LogMetadata,
        /// Answer given.
        accepted: bool,
    },
    /// `log` delivered a record.
    Log(LogEntry),
    /// `flush` was called.
    Flush,
}

impl SinkCall {
    /// Target of the call, if it carries one.
    pub fn target(&self) -> Option<&str> {
        match self {
            SinkCall::Enabled { metadata, .. } => Some(&metadata.target),
            SinkCall::Log(entry) => Some(&entry.target),
            SinkCall::Flush => None,
        }
    }
}

/// A sink that records every call.
#[derive(Debug, Default)]
pub struct CaptureSink {
    journal: Mutex<Vec<SinkCall>>,
    rejected: BTreeSet<String>,
}

impl CaptureSink {
    /// Creates a sink accepting every target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `false` from `enabled` for `target`.
    #[must_use]
    pub fn rejecting(mut self, target: impl Into<String>) -> Self {
        self.rejected.insert(target.into());
        self
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.journal.lock().clone()
    }

    /// Calls carrying `target`, in order.
    pub fn calls_for(&self, target: &str) -> Vec<SinkCall> {
        self.journal
            .lock()
            .iter()
            .filter(|call| call.target() == Some(target))
            .cloned()
            .collect()
    }

    /// Every logged entry so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.journal
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Log(entry) => Some(entry.clone()),
                _ => None,
            })
            .collect()
    }

    /// Logged entries carrying `target`.
    pub fn entries_for(&self, target: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.target == target)
            .collect()
    }

    /// Number of `flush` calls so far.
    pub fn flush_count(&self) -> usize {
        self.journal
            .lock()
            .iter()
            .filter(|call| matches!(call, SinkCall::Flush))
            .count()
    }
}

impl LogSink for CaptureSink {
    fn enabled(&self, metadata: &LogMetadata) -> bool {
        let accepted = !self.rejected.contains(&metadata.target);
        self.journal.lock().push(SinkCall::Enabled {
            metadata: metadata.clone(),
            accepted,
        });
        accepted
    }

    fn log(&self, entry: &LogEntry) {
        self.journal.lock().push(SinkCall::Log(entry.clone()));
    }

    fn flush(&self) {
        self.journal.lock().push(SinkCall::Flush);
    }
}

/// Checks that every `log` in `calls` directly follows an accepting `enabled`
/// with the same metadata, and that no rejected metadata was logged.
///
/// Returns the number of logged entries.
pub fn assert_enabled_before_log(calls: &[SinkCall]) -> usize {
    let mut logged = 0;
    let mut pending: Option<&LogMetadata> = None;
    for call in calls {
        match call {
            SinkCall::Enabled { metadata, accepted } => {
                pending = accepted.then_some(metadata);
            }
            SinkCall::Log(entry) => {
                let asked = pending
                    .take()
                    .unwrap_or_else(|| panic!("log without accepting enabled: {entry:?}"));
                assert_eq!(*asked, entry.metadata(), "enabled/log metadata differ");
                logged += 1;
            }
            SinkCall::Flush => {}
        }
    }
    logged
}
