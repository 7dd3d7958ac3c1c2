//! Severity levels and level filters.
//!
//! Codes are fixed by the wire contract: a [`Level`] travels as a signed
//! 64-bit integer inside `ExternCMetadata`, a [`LevelFilter`] as an unsigned
//! 32-bit integer inside `LogParam`. Lower codes are more severe.

use crate::error::{AbiError, AbiResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity of a single log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Error (code 1).
    Error,
    /// Warning (code 2).
    Warn,
    /// Informational (code 3).
    Info,
    /// Debug (code 4).
    Debug,
    /// Trace (code 5).
    Trace,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Returns the wire code for this level.
    pub const fn code(self) -> i64 {
        match self {
            Level::Error => 1,
            Level::Warn => 2,
            Level::Info => 3,
            Level::Debug => 4,
            Level::Trace => 5,
        }
    }

    /// Decodes a wire code.
    pub fn from_code(code: i64) -> AbiResult<Self> {
        match code {
            1 => Ok(Level::Error),
            2 => Ok(Level::Warn),
            3 => Ok(Level::Info),
            4 => Ok(Level::Debug),
            5 => Ok(Level::Trace),
            other => Err(AbiError::InvalidLevel(other)),
        }
    }

    /// Returns the equivalent `tracing` level.
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            Level::Error => tracing::Level::ERROR,
            Level::Warn => tracing::Level::WARN,
            Level::Info => tracing::Level::INFO,
            Level::Debug => tracing::Level::DEBUG,
            Level::Trace => tracing::Level::TRACE,
        }
    }

    /// Returns the upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Level::Error
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else if level == tracing::Level::INFO {
            Level::Info
        } else if level == tracing::Level::DEBUG {
            Level::Debug
        } else {
            Level::Trace
        }
    }
}

impl TryFrom<i64> for Level {
    type Error = AbiError;

    fn try_from(code: i64) -> AbiResult<Self> {
        Level::from_code(code)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum severity a caller wants the library to consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LevelFilter {
    /// Nothing passes (code 0).
    Off,
    /// Errors only (code 1).
    Error,
    /// Warnings and above (code 2).
    Warn,
    /// Info and above (code 3).
    #[default]
    Info,
    /// Debug and above (code 4).
    Debug,
    /// Everything (code 5).
    Trace,
}

impl LevelFilter {
    /// Returns the wire code for this filter.
    pub const fn code(self) -> u32 {
        match self {
            LevelFilter::Off => 0,
            LevelFilter::Error => 1,
            LevelFilter::Warn => 2,
            LevelFilter::Info => 3,
            LevelFilter::Debug => 4,
            LevelFilter::Trace => 5,
        }
    }

    /// Decodes a wire code.
    pub fn from_code(code: u32) -> AbiResult<Self> {
        match code {
            0 => Ok(LevelFilter::Off),
            1 => Ok(LevelFilter::Error),
            2 => Ok(LevelFilter::Warn),
            3 => Ok(LevelFilter::Info),
            4 => Ok(LevelFilter::Debug),
            5 => Ok(LevelFilter::Trace),
            other => Err(AbiError::InvalidLevelFilter(other)),
        }
    }

    /// Returns true if an event at `level` passes this filter.
    pub const fn allows(self, level: Level) -> bool {
        level.code() <= self.code() as i64
    }

    /// Returns the equivalent `tracing` filter.
    pub fn as_tracing(self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter as T;
        match self {
            LevelFilter::Off => T::OFF,
            LevelFilter::Error => T::ERROR,
            LevelFilter::Warn => T::WARN,
            LevelFilter::Info => T::INFO,
            LevelFilter::Debug => T::DEBUG,
            LevelFilter::Trace => T::TRACE,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = AbiError;

    fn from_str(s: &str) -> AbiResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(LevelFilter::Off),
            "error" => Ok(LevelFilter::Error),
            "warn" | "warning" => Ok(LevelFilter::Warn),
            "info" => Ok(LevelFilter::Info),
            "debug" => Ok(LevelFilter::Debug),
            "trace" => Ok(LevelFilter::Trace),
            _ => Err(AbiError::UnknownLevelName(s.to_string())),
        }
    }
}
