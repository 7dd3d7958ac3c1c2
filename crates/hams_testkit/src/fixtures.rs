//! Record fixtures.
//!
//! [`RecordFields`] holds the inputs of one log event. It can build the wire
//! record the native side would emit and the entry a receiver should decode
//! from it.

use hams_abi::{EmittedRecord, Level, LogEntry, LogMetadata};

/// Inputs of one log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    /// Severity.
    pub level: Level,
    /// Origin subsystem name.
    pub target: String,
    /// Formatted message.
    pub message: String,
    /// Module path, if any.
    pub module_path: Option<String>,
    /// Source file, if any.
    pub file: Option<String>,
    /// Source line, if any. Line 0 is not a valid source line.
    pub line: Option<u32>,
}

impl RecordFields {
    /// A minimal record with no location.
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            target: target.into(),
            message: message.into(),
            module_path: None,
            file: None,
            line: None,
        }
    }

    /// Adds a source location.
    #[must_use]
    pub fn located(mut self, module_path: &str, file: &str, line: u32) -> Self {
        self.module_path = Some(module_path.to_string());
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    /// Builds the wire record, borrowing from `self`.
    pub fn emit(&self) -> EmittedRecord<'_> {
        EmittedRecord::new(
            self.level,
            &self.target,
            self.message.clone(),
            self.module_path.as_deref(),
            self.file.as_deref(),
            self.line,
        )
    }

    /// The entry a receiver should decode.
    pub fn expected_entry(&self) -> LogEntry {
        LogEntry {
            level: self.level,
            target: self.target.clone(),
            message: self.message.clone(),
            module_path: self.module_path.clone(),
            file: self.file.clone(),
            line: self.line.map(u64::from),
        }
    }

    /// The metadata a receiver should decode.
    pub fn expected_metadata(&self) -> LogMetadata {
        LogMetadata {
            level: self.level,
            target: self.target.clone(),
        }
    }
}

/// A fixed set of records covering every level, with and without location.
pub fn sample_records() -> Vec<RecordFields> {
    vec![
        RecordFields::new(Level::Error, "hams_ffi", "start failed")
            .located("hams_ffi::hams", "src/hams.rs", 62),
        RecordFields::new(Level::Warn, "hams_ffi::logger", "slow flush"),
        RecordFields::new(Level::Info, "hams", "Started HaMS")
            .located("hams_ffi::hams", "src/hams.rs", 67),
        RecordFields::new(Level::Debug, "", ""),
        RecordFields::new(Level::Trace, "ünïcødé::target", "日本語 message ✓"),
    ]
}
