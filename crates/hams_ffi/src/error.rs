//! Error types, last-error reporting and panic containment for exports.

use hams_abi::{AbiError, HamsStatus, StatusCode};
use std::cell::RefCell;
use std::ffi::CString;
use std::panic::{catch_unwind, UnwindSafe};
use std::str::Utf8Error;
use thiserror::Error;

/// Result type for native operations.
pub type HamsResult<T> = Result<T, HamsError>;

/// Errors raised inside the native library.
#[derive(Debug, Error)]
pub enum HamsError {
    /// A required pointer argument was null.
    #[error("null pointer argument")]
    NullPointer,

    /// Instance name was not valid UTF-8.
    #[error("invalid instance name: {0}")]
    InvalidName(#[from] Utf8Error),

    /// A wire value could not be decoded.
    #[error("invalid argument: {0}")]
    Abi(#[from] AbiError),

    /// Handle is unknown or already freed.
    #[error("unknown or freed handle {0:#x}")]
    InvalidHandle(usize),

    /// Start requested while running.
    #[error("instance {0} is already running")]
    AlreadyRunning(String),

    /// Stop requested while not running.
    #[error("instance {0} is not running")]
    NotRunning(String),

    /// A logger callback table is already registered.
    #[error("logger already registered; re-registration is not supported")]
    AlreadyRegistered,

    /// No logger callback table is registered.
    #[error("no logger registered")]
    NotRegistered,

    /// Another global tracing subscriber was installed first.
    #[error("a global tracing subscriber is already installed")]
    SubscriberConflict,
}

impl HamsError {
    /// Maps this error onto the status code returned across the boundary.
    pub fn status(&self) -> HamsStatus {
        match self {
            HamsError::NullPointer => HamsStatus::NullPointer,
            HamsError::InvalidName(_) | HamsError::Abi(_) => HamsStatus::InvalidArgument,
            HamsError::InvalidHandle(_) => HamsStatus::InvalidHandle,
            HamsError::AlreadyRunning(_) => HamsStatus::AlreadyRunning,
            HamsError::NotRunning(_) => HamsStatus::NotRunning,
            HamsError::AlreadyRegistered => HamsStatus::AlreadyRegistered,
            HamsError::NotRegistered => HamsStatus::NotRegistered,
            HamsError::SubscriberConflict => HamsStatus::Error,
        }
    }
}

// Thread-local storage for last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Sets the last error message.
pub fn set_last_error(message: impl Into<String>) {
    let msg = message.into();
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clears the last error.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Returns a copy of the last error message on this thread.
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|c| c.to_string_lossy().into_owned())
    })
}

/// Runs an export body, mapping errors and panics onto a status code.
///
/// Clears the last error first; on failure records the message so
/// `hams_get_last_error` can report it. Panics never unwind into the caller.
pub(crate) fn guard<F>(operation: &str, body: F) -> StatusCode
where
    F: FnOnce() -> HamsResult<()> + UnwindSafe,
{
    clear_last_error();
    match catch_unwind(body) {
        Ok(Ok(())) => HamsStatus::Ok.into(),
        Ok(Err(e)) => {
            set_last_error(e.to_string());
            e.status().into()
        }
        Err(_) => {
            set_last_error(format!("panic in {operation}"));
            HamsStatus::Panicked.into()
        }
    }
}

/// Gets the last error message as a C string.
///
/// Returns null if no error is set.
///
/// # Safety
///
/// The returned pointer is valid until the next FFI call on this thread.
#[no_mangle]
pub extern "C" fn hams_get_last_error() -> *const std::ffi::c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn hams_clear_error() {
    clear_last_error();
}
