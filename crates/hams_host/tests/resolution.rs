//! Symbol resolution and call-shape validation.

use hams_abi::{AbiLayout, TypeLayout};
use hams_host::{DynamicLibrary, HamsLibrary, HostConfig, HostError, SymbolSource, EXPORTS};
use hams_testkit::{linked_library, linked_library_without};
use std::ffi::c_void;

#[test]
fn every_missing_export_is_named() {
    for name in EXPORTS {
        match HamsLibrary::load(linked_library_without(name)) {
            Err(HostError::SymbolNotFound { symbol }) => assert_eq!(symbol, name),
            other => panic!("{name}: unexpected {other:?}"),
        }
    }
}

#[test]
fn nonexistent_symbol() {
    let table = linked_library();
    assert!(matches!(
        table.resolve("hams_does_not_exist"),
        Err(HostError::SymbolNotFound { symbol }) if symbol == "hams_does_not_exist"
    ));
}

extern "C" fn old_abi_layout() -> AbiLayout {
    AbiLayout {
        abi_version: 0,
        ..AbiLayout::current()
    }
}

extern "C" fn narrow_record_layout() -> AbiLayout {
    AbiLayout {
        metadata: TypeLayout { size: 16, align: 8 },
        ..AbiLayout::current()
    }
}

#[test]
fn null_export_is_not_called() {
    let table = unsafe { linked_library().with("hams_abi_layout", std::ptr::null()) };
    match HamsLibrary::load(table) {
        Err(HostError::SymbolNotFound { symbol }) => assert_eq!(symbol, "hams_abi_layout"),
        other => panic!("unexpected {other:?}"),
    }

    let table = unsafe { linked_library().with("hams_logger_init", std::ptr::null()) };
    assert!(matches!(
        HamsLibrary::load(table),
        Err(HostError::SymbolNotFound { symbol }) if symbol == "hams_logger_init"
    ));
}

#[test]
fn abi_version_mismatch() {
    let table = unsafe { linked_library().with("hams_abi_layout", old_abi_layout as *const c_void) };
    match HamsLibrary::load(table) {
        Err(HostError::SignatureMismatch {
            item,
            expected,
            actual,
        }) => {
            assert_eq!(item, "abi_version");
            assert_eq!(expected, hams_abi::ABI_VERSION.to_string());
            assert_eq!(actual, "0");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn structure_layout_mismatch() {
    let table =
        unsafe { linked_library().with("hams_abi_layout", narrow_record_layout as *const c_void) };
    let err = HamsLibrary::load(table).unwrap_err();
    assert!(matches!(
        err,
        HostError::SignatureMismatch {
            item: "ExternCMetadata",
            ..
        }
    ));
    assert!(err.to_string().contains("library reports size 16 align 8"));
}

#[test]
fn load_failures() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("libhams_missing.so");
    assert!(matches!(
        unsafe { HamsLibrary::open(&missing) },
        Err(HostError::LoadFailed { .. })
    ));

    let garbage = dir.path().join("libhams_garbage.so");
    std::fs::write(&garbage, [0u8; 64]).unwrap();
    assert!(matches!(
        unsafe { DynamicLibrary::open(&garbage) },
        Err(HostError::LoadFailed { .. })
    ));

    assert!(matches!(
        unsafe { HamsLibrary::from_config(&HostConfig::new()) },
        Err(HostError::InvalidConfig(_))
    ));
}

#[test]
fn linked_library_loads() {
    let library = HamsLibrary::load(linked_library()).unwrap();
    assert_eq!(library.describe(), "symbol table hams_ffi (linked)");
    assert_eq!(library.layout(), AbiLayout::current());
}
