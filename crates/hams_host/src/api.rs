//! Typed call stubs for the native exports.
//!
//! Every export is resolved eagerly and reinterpreted with the signature it
//! was compiled with. Setup fails with `SymbolNotFound` if any export is
//! absent or resolves to null, and with `SignatureMismatch` if the library reports a wire layout
//! different from the one compiled into this crate. No native call other than
//! `hams_abi_layout` is made before both checks pass.

use crate::error::{HostError, HostResult};
use crate::symbols::SymbolSource;
use hams_abi::{AbiLayout, LogParam, StatusCode};
use std::ffi::{c_char, c_int, c_void};
use std::mem::{size_of, transmute_copy};
use tracing::debug;

/// Opaque native instance, only ever seen behind a pointer.
#[repr(C)]
pub struct NativeHandle {
    _private: [u8; 0],
}

/// Names of every export the adapter requires.
pub const EXPORTS: [&str; 12] = [
    "hello_world",
    "hello_node",
    "hams_logger_init",
    "hams_logger_flush",
    "hams_init",
    "hams_start",
    "hams_stop",
    "hams_free",
    "hams_version",
    "hams_abi_layout",
    "hams_get_last_error",
    "hams_clear_error",
];

/// Resolved entry points of the native library.
#[derive(Debug, Clone, Copy)]
pub struct NativeApi {
    /// `hello_world`.
    pub hello_world: unsafe extern "C" fn(),
    /// `hello_node`.
    pub hello_node: unsafe extern "C" fn() -> c_int,
    /// `hams_logger_init`.
    pub logger_init: unsafe extern "C" fn(LogParam) -> StatusCode,
    /// `hams_logger_flush`.
    pub logger_flush: unsafe extern "C" fn() -> StatusCode,
    /// `hams_init`.
    pub init: unsafe extern "C" fn(*const c_char) -> *mut NativeHandle,
    /// `hams_start`.
    pub start: unsafe extern "C" fn(*mut NativeHandle) -> StatusCode,
    /// `hams_stop`.
    pub stop: unsafe extern "C" fn(*mut NativeHandle) -> StatusCode,
    /// `hams_free`.
    pub free: unsafe extern "C" fn(*mut NativeHandle) -> StatusCode,
    /// `hams_version`.
    pub version: unsafe extern "C" fn() -> *const c_char,
    /// `hams_abi_layout`.
    pub abi_layout: unsafe extern "C" fn() -> AbiLayout,
    /// `hams_get_last_error`.
    pub get_last_error: unsafe extern "C" fn() -> *const c_char,
    /// `hams_clear_error`.
    pub clear_error: unsafe extern "C" fn(),
}

/// Resolves `name` and reinterprets its address as the function type `F`.
///
/// # Safety
///
/// `F` must be a function pointer type matching the export's real signature.
unsafe fn typed<F: Copy>(source: &dyn SymbolSource, name: &str) -> HostResult<F> {
    debug_assert_eq!(size_of::<F>(), size_of::<*const c_void>());
    let address = source.resolve(name)?;
    if address.is_null() {
        return Err(HostError::SymbolNotFound {
            symbol: name.to_string(),
        });
    }
    Ok(transmute_copy::<*const c_void, F>(&address))
}

impl NativeApi {
    /// Resolves every export from `source` and validates the layout report.
    pub fn resolve(source: &dyn SymbolSource) -> HostResult<Self> {
        // Safety: each type below is the signature `hams_ffi` compiles the
        // export with; the layout check rejects incompatible builds.
        let api = unsafe {
            Self {
                hello_world: typed(source, "hello_world")?,
                hello_node: typed(source, "hello_node")?,
                logger_init: typed(source, "hams_logger_init")?,
                logger_flush: typed(source, "hams_logger_flush")?,
                init: typed(source, "hams_init")?,
                start: typed(source, "hams_start")?,
                stop: typed(source, "hams_stop")?,
                free: typed(source, "hams_free")?,
                version: typed(source, "hams_version")?,
                abi_layout: typed(source, "hams_abi_layout")?,
                get_last_error: typed(source, "hams_get_last_error")?,
                clear_error: typed(source, "hams_clear_error")?,
            }
        };

        let reported = api.layout();
        AbiLayout::current().check(&reported)?;
        debug!(source = %source.describe(), abi_version = reported.abi_version, "Validated native layout");
        Ok(api)
    }

    /// Layout report of the library.
    pub fn layout(&self) -> AbiLayout {
        // Safety: `hams_abi_layout` takes no arguments and returns by value.
        unsafe { (self.abi_layout)() }
    }
}
