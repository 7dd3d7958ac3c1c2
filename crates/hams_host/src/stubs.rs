//! Reverse call stubs: `extern "C"` trampolines the native side calls back.
//!
//! The sink behind the trampolines is leaked when it is installed and never
//! released. The native library keeps the trampoline addresses for the rest
//! of the process, and a trampoline on another thread may still be using the
//! sink, so there is no point at which it could be dropped safely.
//!
//! Installing is one-time once it succeeds. [`ReverseStubs::install_with`]
//! unbinds the sink again if the registration step fails, so a failed
//! registration can be retried.
//!
//! Trampolines never unwind into native code: panics in a sink are caught,
//! reported through `tracing`, and turned into a "not enabled" answer.

use crate::error::{HostError, HostResult};
use crate::sink::LogSink;
use hams_abi::{ExternCMetadata, ExternCRecord, LevelFilter, LogEntry, LogMetadata, LogParam};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

static SINK: RwLock<Option<&'static dyn LogSink>> = parking_lot::const_rwlock(None);
static INSTALL: Mutex<()> = parking_lot::const_mutex(());

/// The installed trampolines and the filter to hand to the library.
#[derive(Clone, Copy)]
pub struct ReverseStubs {
    sink: &'static dyn LogSink,
    filter: LevelFilter,
}

impl std::fmt::Debug for ReverseStubs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverseStubs")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl ReverseStubs {
    /// Installs `sink` for the rest of the process.
    ///
    /// Fails with `AlreadyRegistered` if a sink is already installed.
    pub fn install<S: LogSink + 'static>(sink: S, filter: LevelFilter) -> HostResult<Self> {
        Self::install_with(sink, filter, |_| Ok(()))
    }

    /// Installs `sink`, then runs `register` with the trampoline table.
    ///
    /// The sink is bound before `register` runs so records emitted during
    /// registration are delivered. If `register` fails the sink is unbound
    /// and the error returned; [`is_installed`] is false again.
    pub fn install_with<S, F>(sink: S, filter: LevelFilter, register: F) -> HostResult<Self>
    where
        S: LogSink + 'static,
        F: FnOnce(LogParam) -> HostResult<()>,
    {
        let _install = INSTALL.lock();
        if SINK.read().is_some() {
            return Err(HostError::AlreadyRegistered);
        }
        let leaked: &'static dyn LogSink = Box::leak(Box::new(sink));
        *SINK.write() = Some(leaked);

        let stubs = Self {
            sink: leaked,
            filter,
        };
        if let Err(e) = register(stubs.param()) {
            *SINK.write() = None;
            return Err(e);
        }
        Ok(stubs)
    }

    /// The callback table pointing at the trampolines.
    pub fn param(&self) -> LogParam {
        LogParam::new(enabled_trampoline, log_trampoline, flush_trampoline, self.filter)
    }

    /// The installed sink.
    pub fn sink(&self) -> &'static dyn LogSink {
        self.sink
    }

    /// Filter handed to the library.
    pub fn filter(&self) -> LevelFilter {
        self.filter
    }
}

/// Returns true once a sink has been installed in this process.
pub fn is_installed() -> bool {
    SINK.read().is_some()
}

fn bound_sink() -> Option<&'static dyn LogSink> {
    *SINK.read()
}

extern "C" fn enabled_trampoline(metadata: ExternCMetadata) -> bool {
    let Some(sink) = bound_sink() else {
        return false;
    };
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        // Safety: `metadata` is the value handed to this call.
        match unsafe { LogMetadata::from_extern(&metadata) } {
            Ok(metadata) => sink.enabled(&metadata),
            Err(e) => {
                warn!(error = %e, "Dropping native log metadata");
                false
            }
        }
    }));
    outcome.unwrap_or_else(|_| {
        warn!("Log sink panicked in enabled");
        false
    })
}

extern "C" fn log_trampoline(record: *const ExternCRecord) {
    let Some(sink) = bound_sink() else {
        return;
    };
    if record.is_null() {
        return;
    }
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        // Safety: non-null, and valid for the duration of this call.
        match unsafe { LogEntry::from_record(&*record) } {
            Ok(entry) => sink.log(&entry),
            Err(e) => warn!(error = %e, "Dropping native log record"),
        }
    }));
    if outcome.is_err() {
        warn!("Log sink panicked in log");
    }
}

extern "C" fn flush_trampoline() {
    let Some(sink) = bound_sink() else {
        return;
    };
    if catch_unwind(AssertUnwindSafe(|| sink.flush())).is_err() {
        warn!("Log sink panicked in flush");
    }
}
