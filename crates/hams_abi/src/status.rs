//! Status codes returned by native exports.

/// Status code type for C compatibility.
pub type StatusCode = i32;

/// Result code for HaMS exports. Zero is success, anything else an error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HamsStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Null pointer argument.
    NullPointer = 2,
    /// Invalid argument (bad UTF-8, unknown level code).
    InvalidArgument = 3,
    /// Handle is unknown or already freed.
    InvalidHandle = 4,
    /// A logger callback table is already registered.
    AlreadyRegistered = 5,
    /// Instance is already started.
    AlreadyRunning = 6,
    /// Instance is not started.
    NotRunning = 7,
    /// The native side panicked; the panic was contained.
    Panicked = 8,
    /// No logger callback table is registered.
    NotRegistered = 9,
}

impl HamsStatus {
    /// Returns true if the status indicates success.
    pub fn is_ok(self) -> bool {
        self == HamsStatus::Ok
    }

    /// Returns true if the status indicates an error.
    pub fn is_err(self) -> bool {
        self != HamsStatus::Ok
    }

    /// Returns the raw code.
    pub fn code(self) -> StatusCode {
        self as StatusCode
    }
}

impl From<HamsStatus> for StatusCode {
    fn from(status: HamsStatus) -> Self {
        status as StatusCode
    }
}

impl From<StatusCode> for HamsStatus {
    fn from(code: StatusCode) -> Self {
        match code {
            0 => HamsStatus::Ok,
            2 => HamsStatus::NullPointer,
            3 => HamsStatus::InvalidArgument,
            4 => HamsStatus::InvalidHandle,
            5 => HamsStatus::AlreadyRegistered,
            6 => HamsStatus::AlreadyRunning,
            7 => HamsStatus::NotRunning,
            8 => HamsStatus::Panicked,
            9 => HamsStatus::NotRegistered,
            _ => HamsStatus::Error,
        }
    }
}
