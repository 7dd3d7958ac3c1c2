//! Safe wrappers over a resolved native library.

use crate::api::{NativeApi, NativeHandle};
use crate::config::HostConfig;
use crate::error::{HostError, HostResult};
use crate::sink::LogSink;
use crate::stubs::ReverseStubs;
use crate::symbols::{DynamicLibrary, SymbolSource};
use hams_abi::{AbiLayout, HamsStatus, LevelFilter, StatusCode};
use std::ffi::{CStr, CString};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// A loaded and validated HaMS native library.
pub struct HamsLibrary {
    api: NativeApi,
    // Keeps a dynamically loaded library mapped while `api` is in use.
    source: Box<dyn SymbolSource>,
}

impl HamsLibrary {
    /// Opens the shared library at `path`.
    ///
    /// # Safety
    ///
    /// As for [`DynamicLibrary::open`]: the file must be a trusted build of
    /// the HaMS library.
    pub unsafe fn open(path: impl AsRef<Path>) -> HostResult<Self> {
        Self::load(DynamicLibrary::open(path)?)
    }

    /// Opens the library named by `config`.
    ///
    /// # Safety
    ///
    /// As for [`HamsLibrary::open`].
    pub unsafe fn from_config(config: &HostConfig) -> HostResult<Self> {
        Self::open(config.library_path()?)
    }

    /// Resolves and validates every export of `source`.
    pub fn load(source: impl SymbolSource + 'static) -> HostResult<Self> {
        let api = NativeApi::resolve(&source)?;
        info!(source = %source.describe(), "Loaded HaMS library");
        Ok(Self {
            api,
            source: Box::new(source),
        })
    }

    /// The resolved entry points.
    pub fn api(&self) -> &NativeApi {
        &self.api
    }

    /// Where the exports were resolved from.
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Installs `sink` and registers it with the library.
    ///
    /// Once registration succeeds the sink stays installed for the rest of
    /// the process, and later calls fail with `AlreadyRegistered`. If the
    /// library rejects the table, the sink is uninstalled and the call may be
    /// retried.
    pub fn register_logger<S: LogSink + 'static>(
        &self,
        sink: S,
        level: LevelFilter,
    ) -> HostResult<ReverseStubs> {
        let stubs = ReverseStubs::install_with(sink, level, |param| {
            // Safety: the trampolines are plain functions and live forever.
            let code = unsafe { (self.api.logger_init)(param) };
            self.check("hams_logger_init", code)
        })?;
        debug!(?level, "Registered native logger");
        Ok(stubs)
    }

    /// Asks the library to call the registered `flush`.
    pub fn flush_logger(&self) -> HostResult<()> {
        // Safety: no arguments.
        let code = unsafe { (self.api.logger_flush)() };
        self.check("hams_logger_flush", code)
    }

    /// Smoke call.
    pub fn hello_world(&self) {
        // Safety: no arguments, no return value.
        unsafe { (self.api.hello_world)() }
    }

    /// Smoke call returning a fixed integer.
    pub fn hello_node(&self) -> i32 {
        // Safety: no arguments.
        unsafe { (self.api.hello_node)() }
    }

    /// Library name and version.
    pub fn version(&self) -> HostResult<String> {
        // Safety: returns a static NUL-terminated string.
        let ptr = unsafe { (self.api.version)() };
        if ptr.is_null() {
            return Err(HostError::NativeStatus {
                operation: "hams_version",
                status: HamsStatus::NullPointer,
                message: String::new(),
            });
        }
        let version = unsafe { CStr::from_ptr(ptr) };
        Ok(version.to_string_lossy().into_owned())
    }

    /// Layout report of the library.
    pub fn layout(&self) -> AbiLayout {
        self.api.layout()
    }

    /// Creates a named instance.
    pub fn create(&self, name: &str) -> HostResult<HamsHandle<'_>> {
        let c_name = CString::new(name).map_err(|_| HostError::InvalidName {
            name: name.to_string(),
        })?;
        // Safety: `c_name` is NUL-terminated and outlives the call.
        let raw = unsafe { (self.api.init)(c_name.as_ptr()) };
        if raw.is_null() {
            return Err(HostError::NativeStatus {
                operation: "hams_init",
                status: HamsStatus::Error,
                message: self.last_error().unwrap_or_default(),
            });
        }
        Ok(HamsHandle {
            library: self,
            raw,
            name: name.to_string(),
            freed: false,
        })
    }

    /// Frees a raw handle obtained from [`HamsHandle::into_raw`].
    ///
    /// # Safety
    ///
    /// The library must tolerate unknown handles. `hams_ffi` does, and reports
    /// a second free as `InvalidHandle`.
    pub unsafe fn free_raw(&self, raw: *mut NativeHandle) -> HostResult<()> {
        let code = (self.api.free)(raw);
        self.check("hams_free", code)
    }

    /// Last error message reported on this thread, if any.
    pub fn last_error(&self) -> Option<String> {
        // Safety: valid until the next native call on this thread; copied now.
        let ptr = unsafe { (self.api.get_last_error)() };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
        }
    }

    /// Clears the last error on this thread.
    pub fn clear_error(&self) {
        // Safety: no arguments.
        unsafe { (self.api.clear_error)() }
    }

    fn check(&self, operation: &'static str, code: StatusCode) -> HostResult<()> {
        let status = HamsStatus::from(code);
        if status.is_ok() {
            return Ok(());
        }
        let message = self.last_error().unwrap_or_default();
        debug!(operation, ?status, %message, "Native call failed");
        Err(HostError::from_status(operation, status, message))
    }
}

impl fmt::Debug for HamsLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamsLibrary")
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}

/// An owned native instance. Freed on drop if not freed explicitly.
pub struct HamsHandle<'lib> {
    library: &'lib HamsLibrary,
    raw: *mut NativeHandle,
    name: String,
    freed: bool,
}

impl HamsHandle<'_> {
    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// INITIALIZED → STARTED.
    pub fn start(&self) -> HostResult<()> {
        // Safety: `raw` came from `hams_init` and has not been freed.
        let code = unsafe { (self.library.api.start)(self.raw) };
        self.library.check("hams_start", code)
    }

    /// STARTED → INITIALIZED.
    pub fn stop(&self) -> HostResult<()> {
        // Safety: as for `start`.
        let code = unsafe { (self.library.api.stop)(self.raw) };
        self.library.check("hams_stop", code)
    }

    /// Frees the instance.
    pub fn free(mut self) -> HostResult<()> {
        self.freed = true;
        // Safety: as for `start`; `self` is consumed so the handle is not reused.
        unsafe { self.library.free_raw(self.raw) }
    }

    /// The native handle, still owned by `self`.
    pub fn as_raw(&self) -> *mut NativeHandle {
        self.raw
    }

    /// Gives up ownership without freeing.
    pub fn into_raw(mut self) -> *mut NativeHandle {
        self.freed = true;
        self.raw
    }
}

impl Drop for HamsHandle<'_> {
    fn drop(&mut self) {
        if self.freed {
            return;
        }
        // Safety: not freed yet.
        if let Err(e) = unsafe { self.library.free_raw(self.raw) } {
            warn!(name = %self.name, error = %e, "Failed to free HaMS handle");
        }
    }
}

impl fmt::Debug for HamsHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamsHandle")
            .field("name", &self.name)
            .field("raw", &self.raw)
            .finish()
    }
}
