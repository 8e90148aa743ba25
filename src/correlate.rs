//! Joining NVAPI display ids with Windows monitor identities.
//!
//! NVAPI and the Windows display configuration each number displays their
//! own way and neither exposes the other's key. The legacy GDI display name
//! (`\\.\DISPLAYn`) is the only identifier both sides understand:
//!
//! 1. walk the driver's display handles and ask for each handle's display name,
//! 2. map every name back to an NVAPI display id until one matches,
//! 3. ask GDI for the monitor interface path registered under that name,
//! 4. look the path up in the CCD target names.
//!
//! The driver's name to id association is unreliable for cloned targets, so
//! paths with more than one target are never correlated.

use {
    crate::{
        driver::{DisplayDriver, DisplayHandle},
        model::DisplayPath,
        os::{resolve_friendly_name, OsDisplayConfig},
    },
    log::debug,
};

/// Enumeration gives up after this many indices without an end marker
const MAX_DISPLAY_HANDLES: u32 = 256;

/// Identities recovered for one NVAPI display id
///
/// Each stage depends on the previous one, so a `None` leaves every later
/// field `None` as well.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityMapping {
    /// NVAPI display id
    pub display_id: u32,
    /// GDI display name, e.g. `\\.\DISPLAY1`
    pub nt_display: Option<String>,
    /// Monitor device interface path
    pub device_path: Option<String>,
    /// Monitor name from the OS display configuration
    pub friendly_name: Option<String>,
}

fn display_handles<'a, D: DisplayDriver + ?Sized>(driver: &'a D) -> impl Iterator<Item = DisplayHandle> + 'a {
    (0..MAX_DISPLAY_HANDLES)
        .map(move |i| (i, driver.display_handle(i)))
        .take_while(|(_, res)| !matches!(res, Ok(None)))
        .filter_map(|(i, res)| match res {
            Ok(handle) => handle,
            Err(e) => {
                debug!("display handle {i}: {e}");
                None
            },
        })
}

/// The GDI display name of the NVAPI display `display_id`
///
/// The first handle whose name maps back to `display_id` wins.
pub fn nt_display_name<D: DisplayDriver + ?Sized>(driver: &D, display_id: u32) -> Option<String> {
    display_handles(driver)
        .filter_map(|handle| match driver.associated_display_name(handle) {
            Ok(name) => Some(name),
            Err(e) => {
                debug!("{handle:?}: {e}");
                None
            },
        })
        .find(|name| match driver.display_id_by_name(name) {
            Ok(id) => id == display_id,
            Err(e) => {
                debug!("{name}: {e}");
                false
            },
        })
}

/// Recover as much of the OS identity of `display_id` as possible
pub fn correlate<D, O>(driver: &D, os: &O, display_id: u32) -> IdentityMapping
where
    D: DisplayDriver + ?Sized,
    O: OsDisplayConfig + ?Sized,
{
    let nt_display = nt_display_name(driver, display_id);
    let device_path = nt_display
        .as_deref()
        .and_then(|name| os.monitor_interface_path(name));
    let friendly_name = device_path
        .as_deref()
        .and_then(|path| resolve_friendly_name(os, path));

    let mapping = IdentityMapping {
        display_id,
        nt_display,
        device_path,
        friendly_name,
    };
    debug!("{mapping:?}");
    mapping
}

/// [`correlate`] the sole target of `path`
///
/// Returns `None` without querying anything when the path has clones.
pub fn correlate_path<D, O>(driver: &D, os: &O, path: &DisplayPath) -> Option<IdentityMapping>
where
    D: DisplayDriver + ?Sized,
    O: OsDisplayConfig + ?Sized,
{
    match &path.targets[..] {
        [target] => Some(correlate(driver, os, target.display_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            os::TargetDeviceName,
            test_utils::{cloned_path, single_target_path, FakeDriver, FakeOs},
        },
    };

    const DEV1: &str = r"\\?\DISPLAY#DELA1E4#5&2004477b&0&UID4352#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}";

    fn driver() -> FakeDriver {
        FakeDriver::with_displays(&[(r"\\.\DISPLAY1", 0x1000), (r"\\.\DISPLAY2", 0x2000)])
    }

    fn os() -> FakeOs {
        FakeOs::with_monitor(r"\\.\DISPLAY2", DEV1, TargetDeviceName {
            monitor_device_path: DEV1.into(),
            friendly_name: "DELL U2720Q".into(),
            friendly_name_from_edid: true,
        })
    }

    #[test]
    fn finds_name_by_mapping_back() {
        assert_eq!(nt_display_name(&driver(), 0x2000).as_deref(), Some(r"\\.\DISPLAY2"));
        assert_eq!(nt_display_name(&driver(), 0x3000), None);
    }

    #[test]
    fn stops_at_first_match() {
        let driver = driver();
        nt_display_name(&driver, 0x1000);
        assert_eq!(driver.id_lookups.get(), 1);
    }

    #[test]
    fn failing_handles_are_skipped() {
        let mut driver = driver();
        driver.handles.insert(0, None);
        driver.failing_indices.push(1);
        driver.handles.insert(1, Some(r"\\.\DISPLAY9".into()));
        assert_eq!(nt_display_name(&driver, 0x2000).as_deref(), Some(r"\\.\DISPLAY2"));
    }

    #[test]
    fn enumeration_ends_at_sentinel() {
        let driver = driver();
        assert_eq!(nt_display_name(&driver, 0x3000), None);
        // two handles, then the end marker
        assert_eq!(driver.handle_queries.get(), 3);
    }

    #[test]
    fn full_chain() {
        let mapping = correlate(&driver(), &os(), 0x2000);
        assert_eq!(mapping.nt_display.as_deref(), Some(r"\\.\DISPLAY2"));
        assert_eq!(mapping.device_path.as_deref(), Some(DEV1));
        assert_eq!(mapping.friendly_name.as_deref(), Some("DELL U2720Q"));
    }

    #[test]
    fn partial_chain() {
        let mapping = correlate(&driver(), &os(), 0x1000);
        assert_eq!(mapping.nt_display.as_deref(), Some(r"\\.\DISPLAY1"));
        assert_eq!(mapping.device_path, None);
        assert_eq!(mapping.friendly_name, None);
    }

    #[test]
    fn clones_are_never_correlated() {
        let driver = driver();
        let os = os();
        assert_eq!(correlate_path(&driver, &os, &cloned_path(0, &[0x1000, 0x2000])), None);
        assert_eq!(driver.handle_queries.get(), 0);
        assert_eq!(driver.id_lookups.get(), 0);
        assert_eq!(os.queries.get(), 0);
    }

    #[test]
    fn single_target_is_correlated() {
        let mapping = correlate_path(&driver(), &os(), &single_target_path(0, 0x2000)).unwrap();
        assert_eq!(mapping.display_id, 0x2000);
        assert_eq!(mapping.friendly_name.as_deref(), Some("DELL U2720Q"));
    }
}
