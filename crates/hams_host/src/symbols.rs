//! Symbol sources: where export addresses come from.
//!
//! [`DynamicLibrary`] resolves names from a shared library opened with
//! `libloading`. [`SymbolTable`] is an in-process name → address map for a
//! library linked into the caller.

use crate::error::{HostError, HostResult};
use libloading::{Library, Symbol};
use std::collections::BTreeMap;
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves exported names to addresses.
pub trait SymbolSource: Send + Sync {
    /// Address of `name`, or `SymbolNotFound`.
    fn resolve(&self, name: &str) -> HostResult<*const c_void>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}

/// A shared library opened from disk.
pub struct DynamicLibrary {
    path: PathBuf,
    library: Library,
}

impl DynamicLibrary {
    /// Opens the library at `path`.
    ///
    /// # Safety
    ///
    /// Loading a library runs its initialisers, and the addresses it exports
    /// are later called with the HaMS signatures. Only open trusted files.
    pub unsafe fn open(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref().to_path_buf();
        let library = Library::new(&path).map_err(|source| HostError::LoadFailed {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Opened native library");
        Ok(Self { path, library })
    }

    /// Path the library was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolSource for DynamicLibrary {
    fn resolve(&self, name: &str) -> HostResult<*const c_void> {
        // Safety: the address is only reinterpreted by `NativeApi` after the
        // layout report has been checked.
        let symbol: Symbol<'_, unsafe extern "C" fn()> = unsafe { self.library.get(name.as_bytes()) }
            .map_err(|_| HostError::SymbolNotFound {
                symbol: name.to_string(),
            })?;
        Ok(*symbol as *const c_void)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// An in-process symbol table.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    name: String,
    // Addresses are stored as integers so the table is Send + Sync.
    symbols: BTreeMap<String, usize>,
}

impl SymbolTable {
    /// Creates an empty table labelled `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: BTreeMap::new(),
        }
    }

    /// Adds or replaces an entry.
    ///
    /// # Safety
    ///
    /// As for [`SymbolTable::insert`].
    #[must_use]
    pub unsafe fn with(mut self, name: impl Into<String>, address: *const c_void) -> Self {
        self.insert(name, address);
        self
    }

    /// Adds or replaces an entry.
    ///
    /// # Safety
    ///
    /// `address` must be null or point to a function with the signature the
    /// consumer of the table expects for `name`. `NativeApi` calls it as
    /// such; null entries are reported as missing.
    pub unsafe fn insert(&mut self, name: impl Into<String>, address: *const c_void) {
        self.symbols.insert(name.into(), address as usize);
    }

    /// Removes an entry, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.symbols.remove(name).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolSource for SymbolTable {
    fn resolve(&self, name: &str) -> HostResult<*const c_void> {
        self.symbols
            .get(name)
            .map(|&address| address as *const c_void)
            .ok_or_else(|| HostError::SymbolNotFound {
                symbol: name.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("symbol table {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "C" fn marker() {}

    #[test]
    fn table_resolves_known_names() {
        let table = unsafe { SymbolTable::new("test").with("marker", marker as *const c_void) };
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("marker").unwrap(), marker as *const c_void);
        assert_eq!(table.describe(), "symbol table test");
    }

    #[test]
    fn table_missing_symbol() {
        let mut table = unsafe { SymbolTable::new("test").with("marker", marker as *const c_void) };
        assert!(table.remove("marker"));
        assert!(table.is_empty());

        match table.resolve("marker") {
            Err(HostError::SymbolNotFound { symbol }) => assert_eq!(symbol, "marker"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_library_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libhams_absent.so");
        assert!(matches!(
            unsafe { DynamicLibrary::open(&path) },
            Err(HostError::LoadFailed { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn garbage_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libhams_garbage.so");
        std::fs::write(&path, b"not a shared object").unwrap();
        assert!(matches!(
            unsafe { DynamicLibrary::open(&path) },
            Err(HostError::LoadFailed { .. })
        ));
    }
}
