#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/nvportinfo/1.0.0/")]

//! Diagnostic report of the display outputs driven by an NVIDIA GPU.
//!
//! The driver's view of the display topology is read through NVAPI,
//! correlated against the Windows display configuration to recover monitor
//! names, and rendered as a nested text report with derived DisplayPort link
//! metrics.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(windows)]
//! # fn main() -> Result<(), nvportinfo::Error> {
//! use nvportinfo::{DisplayDriver, Report, Session, WindowsDisplayConfig};
//!
//! let session = Session::open()?;
//! let paths = session.display_paths()?;
//! let os = WindowsDisplayConfig;
//! Report::new(&session, &os).write(&mut std::io::stdout(), &paths)?;
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

#[cfg(windows)]
pub use self::display::WindowsDisplayConfig;
pub use self::{
    correlate::{correlate, correlate_path, nt_display_name, IdentityMapping},
    driver::{DisplayDriver, DisplayHandle},
    error::{Error, Result},
    metrics::{DerivedMetrics, LinkHint},
    nvapi::{Session, Status},
    os::{resolve_friendly_name, OsDisplayConfig, TargetDeviceName, GENERIC_MONITOR_NAME},
    report::Report,
};
use std::io::{self, Write};

mod correlate;
#[cfg(windows)]
mod display;
mod driver;
mod error;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod nvapi;
mod os;
mod report;
#[cfg(test)]
mod test_utils;

/// Boxed gateways handed to [`run`]
pub type Gateways = (Box<dyn DisplayDriver>, Box<dyn OsDisplayConfig>);

/// Query the driver and write the full report to `out`.
///
/// Returns `Ok(false)` when the gateways could not be opened or the initial
/// display path query failed. Nothing beyond the failure message is written
/// in that case.
pub fn run<W: Write>(out: &mut W, gateways: Result<Gateways>) -> io::Result<bool> {
    let (driver, os) = match gateways {
        Ok(gateways) => gateways,
        Err(e) => {
            log::error!("{e}");
            writeln!(out, "NvAPI_Initialize() failed, nvidia driver missing or borked ({e})")?;
            return Ok(false)
        },
    };

    let paths = match driver.display_paths() {
        Ok(paths) => paths,
        Err(e) => {
            log::error!("{e}");
            writeln!(out, "Unable to query the display configuration: {e}")?;
            return Ok(false)
        },
    };
    log::info!("driver reported {} display path(s)", paths.len());

    Report::new(&*driver, &*os).write(out, &paths)?;
    Ok(true)
}

#[cfg(windows)]
pub(crate) mod win32 {
    use {
        std::fmt::{Display, Write},
        widestring::{WideCStr, WideStr},
        windows::{
            core::{Error, HSTRING},
            Win32::Foundation::WIN32_ERROR,
        },
    };

    pub(crate) fn wide_str_from_slice_truncated(sz: &[u16]) -> &WideStr {
        match WideCStr::from_slice_truncate(&sz) {
            Ok(str) => str.as_ref(),
            Err(_) => WideStr::from_slice(&sz),
        }
    }

    pub(crate) fn win32_error(code: WIN32_ERROR, f: &dyn Display) -> Error {
        let mut str = widestring::Utf16String::new();
        let _res = write!(str, "{f}");
        debug_assert!(_res.is_ok());
        Error::new(code.to_hresult(), HSTRING::from_wide(str.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::test_utils::{single_target_path, FakeDriver, FakeOs},
    };

    fn gateways(driver: FakeDriver) -> Result<Gateways> {
        Ok((Box::new(driver), Box::new(FakeOs::default())))
    }

    #[test]
    fn initialization_failure_skips_report() {
        let mut out = Vec::new();
        let ok = run(&mut out, Err(Error::Library { name: "nvapi64.dll" })).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!ok);
        assert!(out.contains("nvidia driver missing or borked"));
        assert!(!out.contains("Display path"));
    }

    #[test]
    fn path_query_failure_is_fatal() {
        let driver = FakeDriver {
            fail_paths: true,
            ..FakeDriver::default()
        };
        let mut out = Vec::new();
        let ok = run(&mut out, gateways(driver)).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!ok);
        assert!(out.contains("NvAPI_DISP_GetDisplayConfig"));
        assert!(!out.contains("Display path"));
    }

    #[test]
    fn reports_every_path() {
        let driver = FakeDriver {
            paths: vec![single_target_path(0, 0x1000), single_target_path(1, 0x2000)],
            ..FakeDriver::default()
        };
        let mut out = Vec::new();
        assert!(run(&mut out, gateways(driver)).unwrap());
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Display path #0"));
        assert!(out.contains("Display path #1"));
        assert!(out.contains("DisplayID: 0x2000"));
    }
}
