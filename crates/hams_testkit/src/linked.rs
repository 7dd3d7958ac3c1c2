//! The native library, linked into the test binary.
//!
//! Tests resolve exports from a [`SymbolTable`] holding the addresses of the
//! `hams_ffi` functions compiled into the same binary, so the whole adapter
//! path runs without a shared library on disk.
//!
//! A linked library shares the process-wide `tracing` dispatcher with the
//! test. Once a logger is registered, events raised by the test itself are
//! forwarded through the bridge as well.

use hams_host::SymbolTable;
use std::ffi::c_void;

/// A symbol table over every `hams_ffi` export.
#[allow(unsafe_code)]
pub fn linked_library() -> SymbolTable {
    // Safety: each address is the `hams_ffi` function exported under that
    // name, compiled into this binary with the signature `NativeApi` expects.
    unsafe {
        SymbolTable::new("hams_ffi (linked)")
            .with("hello_world", hams_ffi::hello_world as *const c_void)
            .with("hello_node", hams_ffi::hello_node as *const c_void)
            .with("hams_logger_init", hams_ffi::hams_logger_init as *const c_void)
            .with("hams_logger_flush", hams_ffi::hams_logger_flush as *const c_void)
            .with("hams_init", hams_ffi::hams_init as *const c_void)
            .with("hams_start", hams_ffi::hams_start as *const c_void)
            .with("hams_stop", hams_ffi::hams_stop as *const c_void)
            .with("hams_free", hams_ffi::hams_free as *const c_void)
            .with("hams_version", hams_ffi::hams_version as *const c_void)
            .with("hams_abi_layout", hams_ffi::hams_abi_layout as *const c_void)
            .with("hams_get_last_error", hams_ffi::hams_get_last_error as *const c_void)
            .with("hams_clear_error", hams_ffi::hams_clear_error as *const c_void)
    }
}

/// The linked table without `name`, for resolution failure tests.
pub fn linked_library_without(name: &str) -> SymbolTable {
    let mut table = linked_library();
    table.remove(name);
    table
}
