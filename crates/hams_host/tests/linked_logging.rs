//! Log forwarding end to end: tracing event in the linked library →
//! `BridgeLayer` → `LogParam` trampolines → sink.
//!
//! Registration is process-wide and one-time, so every test here shares the
//! sink installed by `fixture`. Tests use distinct targets and only inspect
//! calls carrying their own target.

use hams_host::{HamsLibrary, HamsStatus, HostError, LevelFilter, LogSink};
use hams_testkit::{assert_enabled_before_log, linked_library, CaptureSink, SinkCall};
use std::sync::{Arc, OnceLock};

struct Fixture {
    library: HamsLibrary,
    sink: Arc<CaptureSink>,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let library = HamsLibrary::load(linked_library()).unwrap();
        let sink = Arc::new(CaptureSink::new().rejecting("suppressed"));
        library
            .register_logger(Arc::clone(&sink), LevelFilter::Debug)
            .unwrap();
        Fixture { library, sink }
    })
}

#[test]
fn n_events_produce_n_logs() {
    let fixture = fixture();
    const N: usize = 25;
    for i in 0..N {
        tracing::info!(target: "burst", seq = i, "event {}", i);
    }

    let calls = fixture.sink.calls_for("burst");
    assert_eq!(calls.len(), 2 * N);
    assert_eq!(assert_enabled_before_log(&calls), N);

    let entries = fixture.sink.entries_for("burst");
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.message, format!("event {i} seq={i}"));
        assert!(entry.file.as_deref().unwrap().ends_with("linked_logging.rs"));
        assert!(entry.line.is_some());
    }
}

fn emit_from_worker(worker: usize, seq: usize) {
    match worker {
        0 => tracing::info!(target: "worker_0", "event {}", seq),
        1 => tracing::info!(target: "worker_1", "event {}", seq),
        2 => tracing::info!(target: "worker_2", "event {}", seq),
        _ => tracing::info!(target: "worker_3", "event {}", seq),
    }
}

#[test]
fn concurrent_events_are_all_delivered() {
    let fixture = fixture();
    const WORKERS: usize = 4;
    const M: usize = 50;
    std::thread::scope(|scope| {
        for worker in 0..WORKERS {
            scope.spawn(move || {
                for seq in 0..M {
                    emit_from_worker(worker, seq);
                }
            });
        }
    });

    for worker in 0..WORKERS {
        let target = format!("worker_{worker}");
        let calls = fixture.sink.calls_for(&target);
        assert_eq!(calls.len(), 2 * M, "{target}");
        assert_eq!(assert_enabled_before_log(&calls), M, "{target}");

        let messages: Vec<_> = fixture
            .sink
            .entries_for(&target)
            .into_iter()
            .map(|e| e.message)
            .collect();
        let expected: Vec<_> = (0..M).map(|seq| format!("event {seq}")).collect();
        assert_eq!(messages, expected);
    }
}

#[test]
fn rejected_metadata_is_not_logged() {
    let fixture = fixture();
    tracing::warn!(target: "suppressed", "never delivered");
    tracing::warn!(target: "suppressed", "never delivered either");

    let calls = fixture.sink.calls_for("suppressed");
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|call| matches!(call, SinkCall::Enabled { accepted: false, .. })));
    assert!(fixture.sink.entries_for("suppressed").is_empty());
}

#[test]
fn level_filter_applies_before_enabled() {
    let fixture = fixture();
    tracing::trace!(target: "too_verbose", "below the registered filter");
    tracing::debug!(target: "too_verbose", "at the registered filter");

    let entries = fixture.sink.entries_for("too_verbose");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "at the registered filter");
    assert_eq!(fixture.sink.calls_for("too_verbose").len(), 2);
}

#[test]
fn native_events_reach_the_sink() {
    let fixture = fixture();
    fixture.library.hello_world();
    assert_eq!(fixture.library.hello_node(), 7);

    let entries = fixture.sink.entries_for("hams_ffi");
    assert!(entries.iter().any(|e| e.message == "Hello, world!"));
    assert!(entries.iter().any(|e| e.message == "Hello, node!"));
}

#[test]
fn lifecycle_is_logged() {
    let fixture = fixture();
    let handle = fixture.library.create("logged-instance").unwrap();
    handle.start().unwrap();
    handle.free().unwrap();

    let messages: Vec<_> = fixture
        .sink
        .entries_for("hams_ffi::hams")
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert!(messages.contains(&"Registering HaMS: logged-instance".to_string()));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Started HaMS") && m.contains("logged-instance")));
    assert!(messages.contains(&"Releasing HaMS: logged-instance".to_string()));
}

#[test]
fn flush_reaches_the_sink() {
    let fixture = fixture();
    let before = fixture.sink.flush_count();
    fixture.library.flush_logger().unwrap();
    assert!(fixture.sink.flush_count() > before);
}

#[test]
fn second_registration_rejected() {
    let fixture = fixture();
    assert!(matches!(
        fixture
            .library
            .register_logger(CaptureSink::new(), LevelFilter::Trace),
        Err(HostError::AlreadyRegistered)
    ));

    // The library itself refuses a second table and keeps the first.
    let stubs = hams_host::ReverseStubs::install(CaptureSink::new(), LevelFilter::Trace);
    assert!(stubs.is_err());

    let param = hams_ffi::registered().copied().unwrap();
    let code = unsafe { (fixture.library.api().logger_init)(param) };
    assert_eq!(code, HamsStatus::AlreadyRegistered as i32);

    tracing::info!(target: "after_rejection", "still delivered");
    assert_eq!(fixture.sink.entries_for("after_rejection").len(), 1);
}

#[test]
fn sink_trait_object_is_shared() {
    let fixture = fixture();
    let sink: &dyn LogSink = &*fixture.sink;
    sink.flush();
    assert!(fixture.sink.flush_count() >= 1);
}
