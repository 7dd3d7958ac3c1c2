//! # HaMS ABI
//!
//! Wire-level contract between the HaMS native library and its callers.
//!
//! This crate provides:
//! - `#[repr(C)]` wire structures ([`RustStr`], [`RustString`],
//!   [`ExternCMetadata`], [`ExternCRecord`]) laid out byte-for-byte as the
//!   native library compiles them
//! - The [`LogParam`] callback table handed to `hams_logger_init`
//! - Severity codes ([`Level`], [`LevelFilter`])
//! - Status codes returned by every export ([`HamsStatus`])
//! - A layout report ([`AbiLayout`]) used to validate call shapes at load time
//! - Owned copies of received records ([`LogEntry`], [`LogMetadata`])
//!
//! ## Lifetimes
//!
//! Every pointer carried by a wire structure is a *borrowed view*. It is valid
//! only for the duration of the call that supplied it. Receivers that need the
//! text afterwards copy it with [`LogEntry::from_record`].

#![warn(missing_docs)]

mod decode;
mod error;
mod layout;
mod level;
mod param;
mod status;
mod wire;

pub use decode::{LogEntry, LogMetadata};
pub use error::{AbiError, AbiResult};
pub use layout::{AbiLayout, LayoutMismatch, TypeLayout, ABI_VERSION};
pub use level::{Level, LevelFilter};
pub use param::{EnabledFn, FlushFn, LogFn, LogParam};
pub use status::{HamsStatus, StatusCode};
pub use wire::{EmittedRecord, ExternCMetadata, ExternCRecord, RustStr, RustString};
