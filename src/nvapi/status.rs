use std::fmt::{self, Debug, Display, Formatter};

/// A raw `NvAPI_Status` code
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
#[doc(alias = "NvAPI_Status")]
pub struct Status(pub i32);

#[allow(missing_docs)]
impl Status {
    pub const OK: Self = Status(0);
    pub const ERROR: Self = Status(-1);
    pub const LIBRARY_NOT_FOUND: Self = Status(-2);
    pub const NO_IMPLEMENTATION: Self = Status(-3);
    pub const API_NOT_INITIALIZED: Self = Status(-4);
    pub const INVALID_ARGUMENT: Self = Status(-5);
    pub const NVIDIA_DEVICE_NOT_FOUND: Self = Status(-6);
    pub const END_ENUMERATION: Self = Status(-7);
    pub const INVALID_HANDLE: Self = Status(-8);
    pub const INCOMPATIBLE_STRUCT_VERSION: Self = Status(-9);
    pub const HANDLE_INVALIDATED: Self = Status(-10);
    pub const NOT_SUPPORTED: Self = Status(-104);
}

impl Status {
    /// Whether this is `NVAPI_OK`
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }

    /// The `nvapi.h` constant name of well known codes
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::OK => "NVAPI_OK",
            Self::ERROR => "NVAPI_ERROR",
            Self::LIBRARY_NOT_FOUND => "NVAPI_LIBRARY_NOT_FOUND",
            Self::NO_IMPLEMENTATION => "NVAPI_NO_IMPLEMENTATION",
            Self::API_NOT_INITIALIZED => "NVAPI_API_NOT_INITIALIZED",
            Self::INVALID_ARGUMENT => "NVAPI_INVALID_ARGUMENT",
            Self::NVIDIA_DEVICE_NOT_FOUND => "NVAPI_NVIDIA_DEVICE_NOT_FOUND",
            Self::END_ENUMERATION => "NVAPI_END_ENUMERATION",
            Self::INVALID_HANDLE => "NVAPI_INVALID_HANDLE",
            Self::INCOMPATIBLE_STRUCT_VERSION => "NVAPI_INCOMPATIBLE_STRUCT_VERSION",
            Self::HANDLE_INVALIDATED => "NVAPI_HANDLE_INVALIDATED",
            Self::NOT_SUPPORTED => "NVAPI_NOT_SUPPORTED",
            _ => return None,
        })
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "status {}", self.0)
    }
}

impl Debug for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.debug_tuple("Status").field(&format_args!("{name}")).finish(),
            None => f.debug_tuple("Status").field(&self.0).finish(),
        }
    }
}
