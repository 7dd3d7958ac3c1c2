//! Handle lifecycle exports: `hams_init`, `hams_start`, `hams_stop`, `hams_free`.
//!
//! A handle is an address-sized token, never a real address. Live instances
//! are kept in a process-wide registry keyed by that token, so an unknown,
//! null or already freed handle is rejected with `InvalidHandle` instead of
//! being dereferenced. Tokens are never reused within a process.

use crate::config::HamsConfig;
use crate::error::{guard, set_last_error, HamsError, HamsResult};
use crate::hams::Hams;
use crate::logger;
use hams_abi::StatusCode;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::ffi::{c_char, CStr};
use std::panic::catch_unwind;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// An opaque HaMS instance handle.
///
/// Never dereference or modify directly.
#[repr(C)]
pub struct HamsHandle {
    _private: [u8; 0],
}

static LIVE: Mutex<BTreeMap<usize, Arc<Hams>>> = parking_lot::const_mutex(BTreeMap::new());

// Starts at the alignment of a pointer so tokens never look like null.
static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(std::mem::align_of::<usize>());

/// Registers an instance and returns its handle.
pub fn register(hams: Hams) -> *mut HamsHandle {
    let token = NEXT_TOKEN.fetch_add(std::mem::align_of::<usize>(), Ordering::Relaxed);
    LIVE.lock().insert(token, Arc::new(hams));
    token as *mut HamsHandle
}

/// Looks up a live instance.
pub fn lookup(handle: *mut HamsHandle) -> HamsResult<Arc<Hams>> {
    LIVE.lock()
        .get(&(handle as usize))
        .cloned()
        .ok_or(HamsError::InvalidHandle(handle as usize))
}

/// Removes a live instance. A second removal of the same handle fails.
pub fn release(handle: *mut HamsHandle) -> HamsResult<Arc<Hams>> {
    LIVE.lock()
        .remove(&(handle as usize))
        .ok_or(HamsError::InvalidHandle(handle as usize))
}

/// Number of live instances.
pub fn live_count() -> usize {
    LIVE.lock().len()
}

/// Creates a named instance.
///
/// # Returns
///
/// The handle, or null if `name` is null, not UTF-8, or creation panicked.
/// The reason is available from `hams_get_last_error`.
///
/// # Safety
///
/// `name` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hams_init(name: *const c_char) -> *mut HamsHandle {
    crate::error::clear_last_error();

    if name.is_null() {
        set_last_error(HamsError::NullPointer.to_string());
        return std::ptr::null_mut();
    }

    let name = match CStr::from_ptr(name).to_str() {
        Ok(s) => s.to_owned(),
        Err(e) => {
            set_last_error(HamsError::InvalidName(e).to_string());
            return std::ptr::null_mut();
        }
    };

    match catch_unwind(|| register(Hams::new(HamsConfig::new(name)))) {
        Ok(handle) => handle,
        Err(_) => {
            set_last_error("panic in hams_init");
            std::ptr::null_mut()
        }
    }
}

/// Starts an instance.
///
/// # Returns
///
/// `0` on success; `AlreadyRunning` if started, `InvalidHandle` if unknown.
#[no_mangle]
pub extern "C" fn hams_start(handle: *mut HamsHandle) -> StatusCode {
    guard("hams_start", || lookup(handle)?.start())
}

/// Stops a started instance.
///
/// # Returns
///
/// `0` on success; `NotRunning` if not started, `InvalidHandle` if unknown.
#[no_mangle]
pub extern "C" fn hams_stop(handle: *mut HamsHandle) -> StatusCode {
    guard("hams_stop", || lookup(handle)?.stop().map(|_| ()))
}

/// Frees an instance, stopping it first if it is running.
///
/// # Returns
///
/// `0` on success; `InvalidHandle` if the handle is unknown or already freed.
/// The handle must not be used after a successful call.
#[no_mangle]
pub extern "C" fn hams_free(handle: *mut HamsHandle) -> StatusCode {
    guard("hams_free", || {
        let hams = release(handle)?;
        if hams.is_running() {
            hams.stop()?;
        }
        drop(hams);
        // Nothing to flush if logging was never registered.
        let _ = logger::logger_flush();
        Ok(())
    })
}
