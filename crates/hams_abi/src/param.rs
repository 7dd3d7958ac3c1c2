//! The `LogParam` callback table.

use crate::error::AbiResult;
use crate::level::LevelFilter;
use crate::wire::{ExternCMetadata, ExternCRecord};
use std::fmt;

/// Asks the caller whether an event with this metadata should be logged.
pub type EnabledFn = extern "C" fn(ExternCMetadata) -> bool;

/// Delivers one accepted record. The pointer is valid only during the call.
pub type LogFn = extern "C" fn(*const ExternCRecord);

/// Asks the caller to make buffered output durable.
pub type FlushFn = extern "C" fn();

/// Caller-supplied dispatch table handed once to `hams_logger_init`.
///
/// The functions must stay callable for the rest of the process: there is no
/// unregister operation.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct LogParam {
    /// Cheap pre-filter, called before a record is built.
    pub enabled: EnabledFn,
    /// Receives each accepted record.
    pub log: LogFn,
    /// Flushes buffered output.
    pub flush: FlushFn,
    /// Maximum severity to consider (see [`LevelFilter::code`]).
    pub level: u32,
}

impl LogParam {
    /// Builds a table.
    pub fn new(enabled: EnabledFn, log: LogFn, flush: FlushFn, level: LevelFilter) -> Self {
        Self {
            enabled,
            log,
            flush,
            level: level.code(),
        }
    }

    /// Decodes the level filter.
    pub fn level_filter(&self) -> AbiResult<LevelFilter> {
        LevelFilter::from_code(self.level)
    }
}

impl fmt::Debug for LogParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogParam")
            .field("enabled", &(self.enabled as *const ()))
            .field("log", &(self.log as *const ()))
            .field("flush", &(self.flush as *const ()))
            .field("level", &self.level)
            .finish()
    }
}

#[cfg(all(test, target_pointer_width = "64"))]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    extern "C" fn enabled(_: ExternCMetadata) -> bool {
        true
    }
    extern "C" fn log(_: *const ExternCRecord) {}
    extern "C" fn flush() {}

    #[test]
    fn param_layout() {
        assert_eq!(offset_of!(LogParam, enabled), 0);
        assert_eq!(offset_of!(LogParam, log), 8);
        assert_eq!(offset_of!(LogParam, flush), 16);
        assert_eq!(offset_of!(LogParam, level), 24);
        assert_eq!(size_of::<LogParam>(), 32);
    }

    #[test]
    fn level_round_trip() {
        let param = LogParam::new(enabled, log, flush, LevelFilter::Debug);
        assert_eq!(param.level, 4);
        assert_eq!(param.level_filter().unwrap(), LevelFilter::Debug);

        let bad = LogParam { level: 12, ..param };
        assert!(bad.level_filter().is_err());
    }
}
