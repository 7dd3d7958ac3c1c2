//! Owned copies of received wire values.
//!
//! Callback arguments are only valid while the callback runs. These types
//! copy the text eagerly so it can be kept, queued or sent to another thread.

use crate::error::AbiResult;
use crate::level::Level;
use crate::wire::{EmittedRecord, ExternCMetadata, ExternCRecord};
use serde::Serialize;

/// Owned copy of [`ExternCMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LogMetadata {
    /// Severity.
    pub level: Level,
    /// Origin subsystem name.
    pub target: String,
}

impl LogMetadata {
    /// Copies metadata received from the native side.
    ///
    /// # Safety
    ///
    /// `metadata` must be the value handed to the current callback.
    pub unsafe fn from_extern(metadata: &ExternCMetadata) -> AbiResult<Self> {
        Ok(Self {
            level: metadata.level()?,
            target: metadata.target()?.to_owned(),
        })
    }
}

/// Owned copy of [`ExternCRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Severity.
    pub level: Level,
    /// Origin subsystem name.
    pub target: String,
    /// Formatted message.
    pub message: String,
    /// Module path, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
    /// Source file, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Source line, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
}

impl LogEntry {
    /// Copies a record received from the native side.
    ///
    /// # Safety
    ///
    /// `record` must be the value handed to the current `log` callback.
    pub unsafe fn from_record(record: &ExternCRecord) -> AbiResult<Self> {
        Ok(Self {
            level: record.metadata.level()?,
            target: record.metadata.target()?.to_owned(),
            message: record.message()?.to_owned(),
            module_path: record.module_path()?.map(str::to_owned),
            file: record.file()?.map(str::to_owned),
            line: record.line(),
        })
    }

    /// Returns the metadata part of this entry.
    pub fn metadata(&self) -> LogMetadata {
        LogMetadata {
            level: self.level,
            target: self.target.clone(),
        }
    }
}

impl EmittedRecord<'_> {
    /// Reads the record back as an owned entry.
    pub fn to_entry(&self) -> AbiResult<LogEntry> {
        // Safety: every view in the record borrows data owned or borrowed by
        // `self`, which outlives this call.
        unsafe { LogEntry::from_record(self.record()) }
    }
}
