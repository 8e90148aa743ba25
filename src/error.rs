use {crate::nvapi::Status, std::io, thiserror::Error as ThisError};

/// Failures surfaced by the driver and OS gateways
#[derive(Debug, ThisError)]
pub enum Error {
    /// The NVAPI library could not be loaded
    #[error("{name} could not be loaded")]
    Library {
        /// Library file name
        name: &'static str,
    },

    /// NVAPI does not expose an interface this tool requires
    #[error("NVAPI entry point {name} is not available")]
    EntryPoint {
        /// Function name
        name: &'static str,
    },

    /// An NVAPI call returned a status other than `NVAPI_OK`
    #[error("{call} failed: {message} ({status})")]
    Driver {
        /// Function name
        call: &'static str,
        /// Raw status code
        status: Status,
        /// Driver provided description of `status`
        message: String,
    },

    /// A Windows display configuration call failed
    #[error("{call} failed: {message}")]
    Os {
        /// Function name
        call: &'static str,
        /// Formatted OS error
        message: String,
    },

    /// NVAPI is only available on Windows
    #[error("NVAPI is not supported on this platform")]
    Unsupported,

    /// Writing the report failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// An [`Error::Driver`] described by the status code alone
    pub fn driver(call: &'static str, status: Status) -> Self {
        Error::Driver {
            call,
            status,
            message: status.name().unwrap_or("unrecognised status").into(),
        }
    }

    /// The raw NVAPI status, if this error came from the driver
    pub fn status(&self) -> Option<Status> {
        match *self {
            Error::Driver { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Result alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_names_call_and_status() {
        let e = Error::driver("NvAPI_DISP_GetDisplayConfig", Status::API_NOT_INITIALIZED);
        let text = e.to_string();
        assert!(text.contains("NvAPI_DISP_GetDisplayConfig"));
        assert!(text.contains("NVAPI_API_NOT_INITIALIZED"));
        assert!(text.contains("-4"));
        assert_eq!(e.status(), Some(Status::API_NOT_INITIALIZED));
    }
}
