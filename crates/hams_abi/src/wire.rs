//! Fixed-layout wire structures.
//!
//! Field order and sizes are part of the contract. All structures use the
//! platform's default C alignment (no packing). On a 64-bit target:
//!
//! | Structure         | Size | Align |
//! |-------------------|------|-------|
//! | `RustStr`         | 16   | 8     |
//! | `RustString`      | 24   | 8     |
//! | `ExternCMetadata` | 24   | 8     |
//! | `ExternCRecord`   | 88   | 8     |

use crate::error::{AbiError, AbiResult};
use crate::level::Level;
use std::marker::PhantomData;

/// Reads `len` bytes at `ptr`.
///
/// # Safety
///
/// `ptr` must be null or point to `len` readable bytes alive for `'a`.
unsafe fn bytes_at<'a>(ptr: *const u8, len: u64) -> AbiResult<&'a [u8]> {
    if ptr.is_null() {
        return Err(AbiError::NullPointer);
    }
    let len = usize::try_from(len).map_err(|_| AbiError::LengthOverflow(len))?;
    Ok(std::slice::from_raw_parts(ptr, len))
}

/// Borrowed, non-owning view over UTF-8 bytes.
///
/// A null `ptr` encodes an absent value (`Option<&str>::None`).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RustStr {
    /// Pointer to the first byte.
    pub ptr: *const u8,
    /// Number of bytes.
    pub len: u64,
}

impl RustStr {
    /// Creates the null view.
    pub const fn null() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
        }
    }

    /// Creates a view over `s`.
    ///
    /// The view does not carry the borrow; it must not be read after `s`
    /// is dropped or moved.
    pub fn borrowed(s: &str) -> Self {
        Self {
            ptr: s.as_ptr(),
            len: s.len() as u64,
        }
    }

    /// Returns true if this is the null view.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns the viewed bytes.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` readable bytes that stay alive and unmodified
    /// for the returned lifetime.
    pub unsafe fn as_bytes(&self) -> AbiResult<&[u8]> {
        bytes_at(self.ptr, self.len)
    }

    /// Returns the viewed text, validating UTF-8.
    ///
    /// # Safety
    ///
    /// Same requirements as [`RustStr::as_bytes`].
    pub unsafe fn as_str(&self) -> AbiResult<&str> {
        Ok(std::str::from_utf8(self.as_bytes()?)?)
    }

    /// Returns the viewed text, or `None` for the null view.
    ///
    /// # Safety
    ///
    /// Same requirements as [`RustStr::as_bytes`].
    pub unsafe fn as_opt_str(&self) -> AbiResult<Option<&str>> {
        if self.ptr.is_null() {
            Ok(None)
        } else {
            self.as_str().map(Some)
        }
    }
}

impl From<&str> for RustStr {
    fn from(s: &str) -> Self {
        Self::borrowed(s)
    }
}

impl From<Option<&str>> for RustStr {
    fn from(o: Option<&str>) -> Self {
        o.map_or_else(Self::null, Self::borrowed)
    }
}

/// Owned UTF-8 buffer, lent by the emitting side.
///
/// Ownership stays with the emitter. Receivers treat it as read-only and
/// never free it, whatever `cap` says.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RustString {
    /// Pointer to the first byte.
    pub ptr: *mut u8,
    /// Allocated capacity on the emitting side.
    pub cap: u64,
    /// Number of initialised bytes.
    pub len: u64,
}

impl RustString {
    /// Lends the buffer of `s` without transferring ownership.
    #[allow(clippy::ptr_arg)]
    pub fn lend(s: &String) -> Self {
        Self {
            ptr: s.as_ptr().cast_mut(),
            cap: s.capacity() as u64,
            len: s.len() as u64,
        }
    }

    /// Returns a borrowed view of the initialised bytes.
    pub fn as_view(&self) -> RustStr {
        RustStr {
            ptr: self.ptr.cast_const(),
            len: self.len,
        }
    }

    /// Returns the text, validating UTF-8.
    ///
    /// # Safety
    ///
    /// Same requirements as [`RustStr::as_bytes`].
    pub unsafe fn as_str(&self) -> AbiResult<&str> {
        Ok(std::str::from_utf8(bytes_at(self.ptr, self.len)?)?)
    }
}

/// Severity and origin of a log event.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ExternCMetadata {
    /// Severity code (see [`Level::code`]).
    pub level: i64,
    /// Origin subsystem name.
    pub target: RustStr,
}

impl ExternCMetadata {
    /// Builds metadata over a borrowed target.
    pub fn new(level: Level, target: &str) -> Self {
        Self {
            level: level.code(),
            target: RustStr::borrowed(target),
        }
    }

    /// Decodes the severity code.
    pub fn level(&self) -> AbiResult<Level> {
        Level::from_code(self.level)
    }

    /// Returns the target text.
    ///
    /// # Safety
    ///
    /// Only valid inside the callback that supplied this metadata.
    pub unsafe fn target(&self) -> AbiResult<&str> {
        self.target.as_str()
    }
}

/// One complete log event, passed to the `log` callback by pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ExternCRecord {
    /// Severity and origin.
    pub metadata: ExternCMetadata,
    /// Formatted message.
    pub message: RustString,
    /// Module path, null if unknown.
    pub module_path: RustStr,
    /// Source file, null if unknown.
    pub file: RustStr,
    /// Source line, 0 if unknown.
    pub line: u64,
}

impl ExternCRecord {
    /// Returns the message text.
    ///
    /// # Safety
    ///
    /// Only valid inside the callback that supplied this record.
    pub unsafe fn message(&self) -> AbiResult<&str> {
        self.message.as_str()
    }

    /// Returns the module path, if any.
    ///
    /// # Safety
    ///
    /// Only valid inside the callback that supplied this record.
    pub unsafe fn module_path(&self) -> AbiResult<Option<&str>> {
        self.module_path.as_opt_str()
    }

    /// Returns the source file, if any.
    ///
    /// # Safety
    ///
    /// Only valid inside the callback that supplied this record.
    pub unsafe fn file(&self) -> AbiResult<Option<&str>> {
        self.file.as_opt_str()
    }

    /// Returns the source line, if known.
    pub fn line(&self) -> Option<u64> {
        (self.line != 0).then_some(self.line)
    }
}

/// A record on the emitting side.
///
/// Owns the formatted message and borrows the static parts for `'a`, so the
/// [`ExternCRecord`] it lends stays valid for as long as this value lives.
pub struct EmittedRecord<'a> {
    _message: String,
    record: ExternCRecord,
    _borrow: PhantomData<&'a str>,
}

impl<'a> EmittedRecord<'a> {
    /// Builds a record.
    pub fn new(
        level: Level,
        target: &'a str,
        message: String,
        module_path: Option<&'a str>,
        file: Option<&'a str>,
        line: Option<u32>,
    ) -> Self {
        // The heap buffer does not move when the String is moved below.
        let record = ExternCRecord {
            metadata: ExternCMetadata::new(level, target),
            message: RustString::lend(&message),
            module_path: RustStr::from(module_path),
            file: RustStr::from(file),
            line: line.map_or(0, u64::from),
        };
        Self {
            _message: message,
            record,
            _borrow: PhantomData,
        }
    }

    /// Returns the metadata by value, as passed to `enabled`.
    pub fn metadata(&self) -> ExternCMetadata {
        self.record.metadata
    }

    /// Returns the wire record.
    pub fn record(&self) -> &ExternCRecord {
        &self.record
    }

    /// Returns a pointer to the wire record, as passed to `log`.
    pub fn as_ptr(&self) -> *const ExternCRecord {
        &self.record
    }
}

#[cfg(target_pointer_width = "64")]
const _: () = {
    use std::mem::{align_of, offset_of, size_of};

    assert!(size_of::<RustStr>() == 16);
    assert!(align_of::<RustStr>() == 8);
    assert!(size_of::<RustString>() == 24);
    assert!(size_of::<ExternCMetadata>() == 24);
    assert!(offset_of!(ExternCMetadata, target) == 8);
    assert!(size_of::<ExternCRecord>() == 88);
    assert!(offset_of!(ExternCRecord, message) == 24);
    assert!(offset_of!(ExternCRecord, module_path) == 48);
    assert!(offset_of!(ExternCRecord, file) == 64);
    assert!(offset_of!(ExternCRecord, line) == 80);
};
