//! A registration the library rejects leaves the sink uninstalled, so a
//! later registration against a working library succeeds.

use hams_abi::{LogParam, StatusCode};
use hams_host::{is_installed, HamsLibrary, HamsStatus, HostError, LevelFilter};
use hams_testkit::{linked_library, CaptureSink};
use std::ffi::c_void;
use std::sync::Arc;

extern "C" fn rejecting_logger_init(_: LogParam) -> StatusCode {
    HamsStatus::Error as StatusCode
}

#[test]
fn rejected_registration_can_be_retried() {
    let table =
        unsafe { linked_library().with("hams_logger_init", rejecting_logger_init as *const c_void) };
    let rejecting = HamsLibrary::load(table).unwrap();
    let first = Arc::new(CaptureSink::new());
    match rejecting.register_logger(Arc::clone(&first), LevelFilter::Trace) {
        Err(HostError::NativeStatus {
            operation, status, ..
        }) => {
            assert_eq!(operation, "hams_logger_init");
            assert_eq!(status, HamsStatus::Error);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!is_installed());

    let library = HamsLibrary::load(linked_library()).unwrap();
    let sink = Arc::new(CaptureSink::new());
    library
        .register_logger(Arc::clone(&sink), LevelFilter::Info)
        .unwrap();
    assert!(is_installed());

    tracing::info!(target: "after_retry", "delivered");
    assert_eq!(sink.entries_for("after_retry").len(), 1);
    assert!(first.calls().is_empty());

    assert!(matches!(
        library.register_logger(CaptureSink::new(), LevelFilter::Info),
        Err(HostError::AlreadyRegistered)
    ));
}
