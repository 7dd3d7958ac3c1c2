//! Error types for decoding wire structures.

use std::str::Utf8Error;
use thiserror::Error;

/// Result type for ABI decoding operations.
pub type AbiResult<T> = Result<T, AbiError>;

/// Errors raised while decoding values received across the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// A required pointer was null.
    #[error("null pointer where a value was required")]
    NullPointer,

    /// String bytes were not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// A length does not fit in the platform's address space.
    #[error("length {0} exceeds the platform address space")]
    LengthOverflow(u64),

    /// Unknown severity code in `ExternCMetadata.level`.
    #[error("invalid severity level code: {0}")]
    InvalidLevel(i64),

    /// Unknown filter code in `LogParam.level`.
    #[error("invalid level filter code: {0}")]
    InvalidLevelFilter(u32),

    /// Unknown level name when parsing configuration.
    #[error("unknown level name: {0}")]
    UnknownLevelName(String),
}
