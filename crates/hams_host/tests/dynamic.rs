//! Loads the built cdylib from disk when `HAMS_LIBRARY` points at it, e.g.
//! `HAMS_LIBRARY=target/debug/libhams_ffi.so`. Skipped otherwise.

use hams_host::{HamsLibrary, HostConfig, HostError};

fn configured() -> Option<HamsLibrary> {
    let config = HostConfig::from_env().ok()?;
    config.library.as_ref()?;
    // Safety: the variable names a build of this workspace's `hams_ffi`.
    Some(unsafe { HamsLibrary::from_config(&config) }.unwrap())
}

#[test]
fn shared_library_round_trip() {
    let Some(library) = configured() else {
        return;
    };
    assert_eq!(library.hello_node(), 7);
    assert!(library.version().unwrap().starts_with("hams_ffi:"));

    let handle = library.create("from-disk").unwrap();
    handle.start().unwrap();
    let raw = handle.as_raw();
    handle.free().unwrap();
    assert!(matches!(
        unsafe { library.free_raw(raw) },
        Err(HostError::InvalidHandle { .. })
    ));
}
