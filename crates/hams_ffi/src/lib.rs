//! # HaMS FFI
//!
//! The HaMS native library, exported over a stable C ABI.
//!
//! This crate provides:
//! - Log forwarding: internal `tracing` events are delivered through the
//!   caller's [`LogParam`] table (`hams_logger_init`, `hams_logger_flush`)
//! - Instance lifecycle over opaque handles (`hams_init`, `hams_start`,
//!   `hams_stop`, `hams_free`)
//! - Error code mapping and a thread-local last error
//! - A layout report for load-time validation (`hams_abi_layout`)
//!
//! ## Ownership
//!
//! Every pointer handed to a callback is owned by this library and valid only
//! while the callback runs. Handles are owned by the caller between
//! `hams_init` and `hams_free`. Strings returned by `hams_version` are static.

use hams_abi::AbiLayout;
use std::ffi::{c_char, c_int};
use tracing::info;

mod config;
mod error;
mod hams;
mod handle;
mod logger;

pub use config::HamsConfig;
pub use error::{
    clear_last_error, hams_clear_error, hams_get_last_error, last_error, set_last_error,
    HamsError, HamsResult,
};
pub use hams::{Hams, HamsState};
pub use handle::{
    hams_free, hams_init, hams_start, hams_stop, live_count, lookup, HamsHandle,
};
pub use logger::{
    hams_logger_flush, hams_logger_init, logger_flush, logger_init, registered, BridgeLayer,
};

pub use hams_abi::{HamsStatus, LogParam, StatusCode};

/// Version string returned by [`hams_version`], NUL-terminated.
const VERSION_CSTR: &str = concat!(env!("CARGO_PKG_NAME"), ":", env!("CARGO_PKG_VERSION"), "\0");

/// Logs a greeting through the registered logger.
#[no_mangle]
pub extern "C" fn hello_world() {
    info!("Hello, world!");
}

/// Logs a greeting and returns 7.
#[no_mangle]
pub extern "C" fn hello_node() -> c_int {
    info!("Hello, node!");
    7
}

/// Library name and version as `"hams_ffi:<version>"`.
///
/// The string is static and must not be freed.
#[no_mangle]
pub extern "C" fn hams_version() -> *const c_char {
    VERSION_CSTR.as_ptr().cast()
}

/// Sizes and alignments of every wire structure as compiled here.
#[no_mangle]
pub extern "C" fn hams_abi_layout() -> AbiLayout {
    AbiLayout::current()
}
