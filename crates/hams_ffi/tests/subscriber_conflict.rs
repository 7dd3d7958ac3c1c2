//! Registration when the process already has a global `tracing` subscriber.

use hams_abi::{ExternCMetadata, ExternCRecord, HamsStatus, LevelFilter, LogParam};
use hams_ffi::{hams_get_last_error, hams_logger_flush, hams_logger_init, registered};
use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

static CALLS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn enabled(_: ExternCMetadata) -> bool {
    CALLS.fetch_add(1, Ordering::SeqCst);
    true
}

extern "C" fn log(_: *const ExternCRecord) {
    CALLS.fetch_add(1, Ordering::SeqCst);
}

extern "C" fn flush() {
    CALLS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn conflicting_subscriber_leaves_nothing_registered() {
    tracing::subscriber::set_global_default(tracing_subscriber::registry()).unwrap();

    let param = LogParam::new(enabled, log, flush, LevelFilter::Trace);
    assert_eq!(hams_logger_init(param), HamsStatus::Error as i32);
    let message = unsafe { CStr::from_ptr(hams_get_last_error()) };
    assert!(message.to_string_lossy().contains("subscriber"));
    assert!(registered().is_none());

    // A retry reports the same conflict, not a phantom registration.
    assert_eq!(hams_logger_init(param), HamsStatus::Error as i32);
    assert_eq!(hams_logger_flush(), HamsStatus::NotRegistered as i32);

    tracing::info!("goes to the first subscriber only");
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
}
