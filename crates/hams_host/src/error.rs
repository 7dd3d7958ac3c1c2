//! Error types for the caller-side adapter.

use hams_abi::{HamsStatus, LayoutMismatch};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for adapter operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors raised while loading or calling the native library.
#[derive(Debug, Error)]
pub enum HostError {
    /// The shared library could not be opened.
    #[error("failed to load {}: {source}", path.display())]
    LoadFailed {
        /// Path that was tried.
        path: PathBuf,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// A required export is absent.
    #[error("symbol not found: {symbol}")]
    SymbolNotFound {
        /// Export name.
        symbol: String,
    },

    /// The library was compiled with a different wire layout.
    #[error("signature mismatch on {item}: expected {expected}, library reports {actual}")]
    SignatureMismatch {
        /// Differing item.
        item: &'static str,
        /// Layout compiled into this adapter.
        expected: String,
        /// Layout reported by the library.
        actual: String,
    },

    /// The handle is unknown or already freed.
    #[error("invalid handle: {message}")]
    InvalidHandle {
        /// Message reported by the library.
        message: String,
    },

    /// An instance name contains an interior NUL byte.
    #[error("invalid instance name {name:?}")]
    InvalidName {
        /// Offending name.
        name: String,
    },

    /// A native call returned a non-zero status.
    #[error("{operation} failed with {status:?}: {message}")]
    NativeStatus {
        /// Export that failed.
        operation: &'static str,
        /// Returned status.
        status: HamsStatus,
        /// Message from `hams_get_last_error`, empty if none.
        message: String,
    },

    /// A logger is already registered in this process.
    #[error("logger already registered")]
    AlreadyRegistered,

    /// Configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<LayoutMismatch> for HostError {
    fn from(mismatch: LayoutMismatch) -> Self {
        HostError::SignatureMismatch {
            item: mismatch.item,
            expected: mismatch.expected,
            actual: mismatch.actual,
        }
    }
}

impl HostError {
    /// Maps a non-zero native status onto an error.
    pub fn from_status(operation: &'static str, status: HamsStatus, message: String) -> Self {
        match status {
            HamsStatus::InvalidHandle => HostError::InvalidHandle { message },
            HamsStatus::AlreadyRegistered => HostError::AlreadyRegistered,
            status => HostError::NativeStatus {
                operation,
                status,
                message,
            },
        }
    }
}
