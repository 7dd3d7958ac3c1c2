//! Layout report used to validate call shapes before any call is made.
//!
//! The native library exports `hams_abi_layout`, returning the sizes and
//! alignments it was compiled with. A caller compares the report with its own
//! [`AbiLayout::current`] and refuses to proceed on any difference, instead of
//! corrupting memory on the first callback.

use crate::param::LogParam;
use crate::wire::{ExternCMetadata, ExternCRecord, RustStr, RustString};
use std::fmt;
use std::mem::{align_of, size_of};

/// Version of the wire contract. Bumped on any incompatible change.
pub const ABI_VERSION: u32 = 1;

/// Size and alignment of one type, in bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLayout {
    /// `size_of` the type.
    pub size: u64,
    /// `align_of` the type.
    pub align: u64,
}

impl TypeLayout {
    /// Layout of `T` as compiled here.
    pub fn of<T>() -> Self {
        Self {
            size: size_of::<T>() as u64,
            align: align_of::<T>() as u64,
        }
    }
}

impl fmt::Display for TypeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "size {} align {}", self.size, self.align)
    }
}

/// Compiled layout of every structure that crosses the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbiLayout {
    /// [`ABI_VERSION`] of the reporting side.
    pub abi_version: u32,
    /// Pointer width in bits.
    pub pointer_width: u32,
    /// `RustStr`.
    pub rust_str: TypeLayout,
    /// `RustString`.
    pub rust_string: TypeLayout,
    /// `ExternCMetadata`.
    pub metadata: TypeLayout,
    /// `ExternCRecord`.
    pub record: TypeLayout,
    /// `LogParam`.
    pub log_param: TypeLayout,
}

/// First difference found between two layout reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMismatch {
    /// Name of the differing item.
    pub item: &'static str,
    /// What this side was compiled with.
    pub expected: String,
    /// What the other side reported.
    pub actual: String,
}

impl AbiLayout {
    /// Layout as compiled into this crate.
    pub fn current() -> Self {
        Self {
            abi_version: ABI_VERSION,
            pointer_width: (size_of::<usize>() * 8) as u32,
            rust_str: TypeLayout::of::<RustStr>(),
            rust_string: TypeLayout::of::<RustString>(),
            metadata: TypeLayout::of::<ExternCMetadata>(),
            record: TypeLayout::of::<ExternCRecord>(),
            log_param: TypeLayout::of::<LogParam>(),
        }
    }

    fn types(&self) -> [(&'static str, TypeLayout); 5] {
        [
            ("RustStr", self.rust_str),
            ("RustString", self.rust_string),
            ("ExternCMetadata", self.metadata),
            ("ExternCRecord", self.record),
            ("LogParam", self.log_param),
        ]
    }

    /// Compares `reported` against this (expected) layout.
    pub fn check(&self, reported: &AbiLayout) -> Result<(), LayoutMismatch> {
        if self.abi_version != reported.abi_version {
            return Err(LayoutMismatch {
                item: "abi_version",
                expected: self.abi_version.to_string(),
                actual: reported.abi_version.to_string(),
            });
        }
        if self.pointer_width != reported.pointer_width {
            return Err(LayoutMismatch {
                item: "pointer_width",
                expected: self.pointer_width.to_string(),
                actual: reported.pointer_width.to_string(),
            });
        }
        for ((item, expected), (_, actual)) in self.types().into_iter().zip(reported.types()) {
            if expected != actual {
                return Err(LayoutMismatch {
                    item,
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(())
    }
}
