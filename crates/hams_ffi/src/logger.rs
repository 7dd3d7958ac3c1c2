//! Log forwarding through a caller-registered [`LogParam`].
//!
//! `hams_logger_init` installs a global `tracing` subscriber whose only layer
//! is a [`BridgeLayer`]. For every event the layer:
//!
//! 1. drops it if its level fails `LogParam.level`,
//! 2. asks `enabled` with the event's metadata,
//! 3. formats the message and hands an `ExternCRecord` pointer to `log`.
//!
//! The record and every string it points to live on this side and are valid
//! only while `log` runs.
//!
//! Registration is one-time. A second `hams_logger_init` fails with
//! `AlreadyRegistered` and the first table stays active. If another global
//! subscriber is already installed, registration fails with
//! `SubscriberConflict` and no table is recorded.

use crate::error::{guard, HamsError, HamsResult};
use hams_abi::{EmittedRecord, ExternCMetadata, Level, LevelFilter, LogParam, StatusCode};
use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt::{self, Write};
use std::process;
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{info, Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Name of the Crate
const NAME: &str = env!("CARGO_PKG_NAME");
/// Version of the Crate
const VERSION: &str = env!("CARGO_PKG_VERSION");

static REGISTERED: OnceLock<LogParam> = OnceLock::new();
static INIT: Mutex<()> = parking_lot::const_mutex(());

thread_local! {
    static IN_CALLBACK: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside a caller callback.
///
/// Events raised while a callback runs on the same thread (for example by a
/// caller that logs through this library from its own `log`) are dropped
/// instead of recursing.
struct CallbackScope;

impl CallbackScope {
    fn enter() -> Option<Self> {
        IN_CALLBACK.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(CallbackScope)
            }
        })
    }
}

impl Drop for CallbackScope {
    fn drop(&mut self) {
        IN_CALLBACK.with(|flag| flag.set(false));
    }
}

/// A tracing layer that forwards events through a [`LogParam`].
pub struct BridgeLayer {
    param: LogParam,
    filter: LevelFilter,
}

impl BridgeLayer {
    /// Creates a layer over `param`, validating its level filter.
    pub fn new(param: LogParam) -> HamsResult<Self> {
        let filter = param.level_filter()?;
        Ok(Self { param, filter })
    }

    /// The filter taken from `LogParam.level`.
    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Calls the registered `flush`.
    pub fn flush(&self) {
        if let Some(_scope) = CallbackScope::enter() {
            (self.param.flush)();
        }
    }
}

impl<S: Subscriber> Layer<S> for BridgeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = Level::from(*meta.level());
        if !self.filter.allows(level) {
            return;
        }

        let Some(_scope) = CallbackScope::enter() else {
            return;
        };

        if !(self.param.enabled)(ExternCMetadata::new(level, meta.target())) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let record = EmittedRecord::new(
            level,
            meta.target(),
            visitor.message,
            meta.module_path(),
            meta.file(),
            meta.line(),
        );
        (self.param.log)(record.as_ptr());
    }

    fn max_level_hint(&self) -> Option<tracing::level_filters::LevelFilter> {
        Some(self.filter.as_tracing())
    }
}

/// Formats the `message` field followed by the remaining fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        let _ = write!(self.message, "{name}={value}");
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let fields = std::mem::take(&mut self.message);
            let _ = write!(self.message, "{value:?}");
            if !fields.is_empty() {
                self.message.push(' ');
                self.message.push_str(&fields);
            }
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.record_debug(field, &format_args!("{value}"));
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Registers `param` as the process-wide log destination.
///
/// `param` is recorded only once the global subscriber is in place. A call
/// that fails leaves nothing registered.
pub fn logger_init(param: LogParam) -> HamsResult<()> {
    let layer = BridgeLayer::new(param)?;

    let _init = INIT.lock();
    if REGISTERED.get().is_some() {
        return Err(HamsError::AlreadyRegistered);
    }
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|_| HamsError::SubscriberConflict)?;
    // Cannot fail: `INIT` is held and the slot was empty.
    let _ = REGISTERED.set(param);

    info!(
        "Logging registered for {}:{} (PID: {})",
        NAME,
        VERSION,
        process::id()
    );
    Ok(())
}

/// Returns the registered table, if any.
pub fn registered() -> Option<&'static LogParam> {
    REGISTERED.get()
}

/// Invokes the registered `flush`.
pub fn logger_flush() -> HamsResult<()> {
    let param = REGISTERED.get().ok_or(HamsError::NotRegistered)?;
    if let Some(_scope) = CallbackScope::enter() {
        (param.flush)();
    }
    Ok(())
}

/// Initialise the FFI based logging for this library.
///
/// # Returns
///
/// `0` on success, `AlreadyRegistered` if a table is already installed,
/// `InvalidArgument` if `param.level` is not a known filter code.
///
/// The functions in `param` must stay callable for the rest of the process.
#[no_mangle]
pub extern "C" fn hams_logger_init(param: LogParam) -> StatusCode {
    guard("hams_logger_init", || logger_init(param))
}

/// Asks the registered logger to flush.
///
/// # Returns
///
/// `0` on success, `NotRegistered` if `hams_logger_init` has not succeeded.
#[no_mangle]
pub extern "C" fn hams_logger_flush() -> StatusCode {
    guard("hams_logger_flush", logger_flush)
}
