//! # HaMS Testkit
//!
//! Test utilities for the HaMS logging bridge.
//!
//! This crate provides:
//! - Record fixtures that build wire records and their expected decodings
//! - Property-based test generators using proptest
//! - Capturing sinks that journal every callback
//! - A symbol table over the statically linked native library
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hams_testkit::prelude::*;
//! use std::sync::Arc;
//!
//! #[test]
//! fn events_reach_the_sink() {
//!     let library = HamsLibrary::load(linked_library()).unwrap();
//!     let sink = Arc::new(CaptureSink::new());
//!     library.register_logger(Arc::clone(&sink), LevelFilter::Trace).unwrap();
//!     library.hello_world();
//!     assert!(!sink.entries().is_empty());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod capture;
pub mod fixtures;
pub mod generators;
pub mod linked;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capture::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::linked::*;
    pub use hams_abi::{Level, LevelFilter, LogEntry, LogMetadata};
    pub use hams_host::{HamsLibrary, HostError, LogSink};
}

pub use capture::*;
pub use fixtures::*;
pub use generators::*;
pub use linked::*;
