//! Registration through the C exports. One registration per process, so the
//! whole protocol runs as a single ordered test.

use hams_abi::{ExternCMetadata, ExternCRecord, HamsStatus, LevelFilter, LogEntry, LogParam};
use hams_ffi::{hams_get_last_error, hams_logger_flush, hams_logger_init};
use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};

static ENABLED: AtomicUsize = AtomicUsize::new(0);
static LOGGED: AtomicUsize = AtomicUsize::new(0);
static FLUSHED: AtomicUsize = AtomicUsize::new(0);

extern "C" fn enabled(_: ExternCMetadata) -> bool {
    ENABLED.fetch_add(1, Ordering::SeqCst);
    true
}

extern "C" fn log(record: *const ExternCRecord) {
    let entry = unsafe { LogEntry::from_record(&*record) }.unwrap();
    if entry.target == "registration" {
        LOGGED.fetch_add(1, Ordering::SeqCst);
    }
}

extern "C" fn flush() {
    FLUSHED.fetch_add(1, Ordering::SeqCst);
}

extern "C" fn other_log(_: *const ExternCRecord) {
    panic!("second table must never be called");
}

fn last_error() -> String {
    let ptr = hams_get_last_error();
    assert!(!ptr.is_null());
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

#[test]
fn registration_protocol() {
    assert_eq!(hams_logger_flush(), HamsStatus::NotRegistered as i32);

    let bad = LogParam {
        level: 9,
        ..LogParam::new(enabled, log, flush, LevelFilter::Info)
    };
    assert_eq!(hams_logger_init(bad), HamsStatus::InvalidArgument as i32);
    assert!(last_error().contains("invalid level filter"));

    let param = LogParam::new(enabled, log, flush, LevelFilter::Info);
    assert_eq!(hams_logger_init(param), 0);
    assert!(hams_get_last_error().is_null());

    let second = LogParam::new(enabled, other_log, flush, LevelFilter::Trace);
    assert_eq!(
        hams_logger_init(second),
        HamsStatus::AlreadyRegistered as i32
    );

    let asked = ENABLED.load(Ordering::SeqCst);
    for i in 0..3 {
        tracing::info!(target: "registration", "event {}", i);
    }
    tracing::debug!(target: "registration", "filtered by the first table");
    assert_eq!(LOGGED.load(Ordering::SeqCst), 3);
    assert_eq!(ENABLED.load(Ordering::SeqCst) - asked, 3);

    assert_eq!(hams_logger_flush(), 0);
    assert_eq!(FLUSHED.load(Ordering::SeqCst), 1);
}
