use {crate::Result, log::debug};

/// Reported in place of a friendly name that did not come from the EDID
pub const GENERIC_MONITOR_NAME: &str = "Generic PnP monitor";

/// The OS's name record for one active display target
///
/// This mirrors [`DISPLAYCONFIG_TARGET_DEVICE_NAME`][target_device_name].
///
/// [target_device_name]: https://learn.microsoft.com/en-us/windows/win32/api/wingdi/ns-wingdi-displayconfig_target_device_name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[doc(alias = "DISPLAYCONFIG_TARGET_DEVICE_NAME")]
pub struct TargetDeviceName {
    /// Monitor device interface path, e.g. `\\?\DISPLAY#GSM5B08#...#{e6f07b5f-...}`
    pub monitor_device_path: String,
    /// Raw friendly name, only trustworthy when [`Self::friendly_name_from_edid`] is set
    pub friendly_name: String,
    /// The friendly name was read from the monitor's EDID
    pub friendly_name_from_edid: bool,
}

impl TargetDeviceName {
    /// The name to show for this target
    ///
    /// Names that did not come from the EDID are replaced with
    /// [`GENERIC_MONITOR_NAME`].
    pub fn display_name(&self) -> &str {
        match self.friendly_name_from_edid {
            true => &self.friendly_name,
            false => GENERIC_MONITOR_NAME,
        }
    }
}

/// The operating system's display configuration interface
///
/// Its identifiers are unrelated to the [driver's](crate::DisplayDriver);
/// see [`correlate`](crate::correlate) for how the two are joined.
pub trait OsDisplayConfig {
    /// Name records for every active display path, in path order
    ///
    /// One size query and one fill query; topology changes between the two
    /// are not retried. The outer error means the paths could not be listed
    /// at all; each entry carries its own per-path lookup result.
    #[doc(alias = "QueryDisplayConfig")]
    #[doc(alias = "DisplayConfigGetDeviceInfo")]
    fn target_device_names(&self) -> Result<Vec<Result<TargetDeviceName>>>;

    /// The monitor device interface path registered under a display name
    /// such as `\\.\DISPLAY1`
    #[doc(alias = "EnumDisplayDevicesW")]
    fn monitor_interface_path(&self, display_name: &str) -> Option<String>;
}

/// Look up the friendly name of the monitor at `device_path`
///
/// Records are checked in order and the first whose device path matches
/// wins. The search stops at the first record that could not be read, so a
/// failure only hides matches that come after it.
pub fn resolve_friendly_name<O: OsDisplayConfig + ?Sized>(os: &O, device_path: &str) -> Option<String> {
    let names = match os.target_device_names() {
        Ok(names) => names,
        Err(e) => {
            debug!("unable to list display target names: {e}");
            return None
        },
    };

    for name in names {
        match name {
            Ok(name) if name.monitor_device_path == device_path => return Some(name.display_name().to_owned()),
            Ok(_) => (),
            Err(e) => {
                debug!("unable to read display target name: {e}");
                return None
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use {super::*, crate::test_utils::FakeOs};

    const DELL: &str = r"\\?\DISPLAY#DELA1E4#5&2004477b&0&UID4352#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}";
    const LG: &str = r"\\?\DISPLAY#GSM5B08#5&2004477b&0&UID4353#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}";

    fn os() -> FakeOs {
        FakeOs {
            names: Some(vec![
                Some(TargetDeviceName {
                    monitor_device_path: DELL.into(),
                    friendly_name: "DELL U2720Q".into(),
                    friendly_name_from_edid: true,
                }),
                Some(TargetDeviceName {
                    monitor_device_path: LG.into(),
                    friendly_name: "LG ULTRAGEAR".into(),
                    friendly_name_from_edid: false,
                }),
            ]),
            ..FakeOs::default()
        }
    }

    #[test]
    fn edid_name_is_reported() {
        assert_eq!(resolve_friendly_name(&os(), DELL).as_deref(), Some("DELL U2720Q"));
    }

    #[test]
    fn untrusted_name_is_replaced() {
        assert_eq!(resolve_friendly_name(&os(), LG).as_deref(), Some(GENERIC_MONITOR_NAME));
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert_eq!(resolve_friendly_name(&os(), r"\\?\DISPLAY#AUS27AF#nope"), None);
    }

    #[test]
    fn path_match_is_exact() {
        let prefix = &DELL[..DELL.len() - 1];
        assert_eq!(resolve_friendly_name(&os(), prefix), None);
    }

    #[test]
    fn listing_failure_is_not_found() {
        assert_eq!(resolve_friendly_name(&FakeOs::default(), DELL), None);
    }

    #[test]
    fn first_match_wins() {
        let mut os = os();
        if let Some(names) = os.names.as_mut() {
            names.push(Some(TargetDeviceName {
                monitor_device_path: DELL.into(),
                friendly_name: "DELL duplicate".into(),
                friendly_name_from_edid: true,
            }));
        }
        assert_eq!(resolve_friendly_name(&os, DELL).as_deref(), Some("DELL U2720Q"));
    }

    #[test]
    fn unreadable_record_after_match_is_not_reached() {
        let mut os = os();
        if let Some(names) = os.names.as_mut() {
            names.push(None);
        }
        assert_eq!(resolve_friendly_name(&os, DELL).as_deref(), Some("DELL U2720Q"));
        assert_eq!(resolve_friendly_name(&os, LG).as_deref(), Some(GENERIC_MONITOR_NAME));
    }

    #[test]
    fn unreadable_record_before_match_stops_search() {
        let mut os = os();
        if let Some(names) = os.names.as_mut() {
            names.insert(1, None);
        }
        assert_eq!(resolve_friendly_name(&os, DELL).as_deref(), Some("DELL U2720Q"));
        assert_eq!(resolve_friendly_name(&os, LG), None);
    }
}
