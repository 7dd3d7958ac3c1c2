//! # HaMS Host
//!
//! Caller-side adapter for the HaMS native library.
//!
//! This crate provides:
//! - Symbol sources: a shared library opened with `libloading`
//!   ([`DynamicLibrary`]) or an in-process table ([`SymbolTable`])
//! - Typed call stubs resolved eagerly, with layout validation ([`NativeApi`])
//! - Reverse call stubs the library calls back into ([`ReverseStubs`])
//! - Log destinations ([`LogSink`], [`TracingSink`], [`JsonLinesSink`])
//! - Safe wrappers ([`HamsLibrary`], [`HamsHandle`])
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hams_host::{HamsLibrary, HostConfig, TracingSink};
//!
//! let config = HostConfig::from_env()?;
//! // Safety: HAMS_LIBRARY names a trusted build of the library.
//! let library = unsafe { HamsLibrary::from_config(&config) }?;
//! library.register_logger(TracingSink::new(config.level), config.level)?;
//!
//! let handle = library.create("orders")?;
//! handle.start()?;
//! handle.free()?;
//! ```
//!
//! ## Callback lifetime
//!
//! The native library keeps the registered callbacks for the rest of the
//! process. The sink handed to [`HamsLibrary::register_logger`] is therefore
//! leaked and can never be replaced or dropped.

mod api;
mod config;
mod error;
mod library;
mod sink;
mod stubs;
mod symbols;

pub use api::{NativeApi, NativeHandle, EXPORTS};
pub use config::{HostConfig, LIBRARY_ENV, LOG_ENV};
pub use error::{HostError, HostResult};
pub use library::{HamsHandle, HamsLibrary};
pub use sink::{JsonLinesSink, LogSink, TracingSink};
pub use stubs::{is_installed, ReverseStubs};
pub use symbols::{DynamicLibrary, SymbolSource, SymbolTable};

pub use hams_abi::{HamsStatus, Level, LevelFilter, LogEntry, LogMetadata};
