#[cfg(doc)]
use windows::Win32;
use {
    crate::{
        os::{OsDisplayConfig, TargetDeviceName},
        win32::{wide_str_from_slice_truncated, win32_error},
        Error, Result,
    },
    log::{debug, trace},
    std::{
        fmt::{self, Debug, Display, Formatter},
        mem,
    },
    widestring::{WideCStr, WideCString, WideStr},
    windows::{
        core::{Result as WinResult, PCWSTR},
        Win32::{
            Devices::Display::{
                DisplayConfigGetDeviceInfo, GetDisplayConfigBufferSizes, QueryDisplayConfig,
                DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME, DISPLAYCONFIG_MODE_INFO, DISPLAYCONFIG_PATH_INFO,
                DISPLAYCONFIG_TARGET_DEVICE_NAME,
            },
            Foundation::{ERROR_SUCCESS, WIN32_ERROR},
            Graphics::Gdi::{EnumDisplayDevicesW, DISPLAY_DEVICEW},
        },
    },
};

const EDD_GET_DEVICE_INTERFACE_NAME: u32 = 0x1;
const QDC_ONLY_ACTIVE_PATHS: u32 = 0x2;
const QDC_VIRTUAL_MODE_AWARE: u32 = 0x10;
const FRIENDLY_NAME_FROM_EDID: u32 = 0x1;

/// Information representing a display or monitor device
///
/// This wraps a [`DISPLAY_DEVICE`][display_device].
///
/// See also: [`Win32::Graphics::Gdi::DISPLAY_DEVICEW`]
///
/// [display_device]: https://learn.microsoft.com/en-us/windows/win32/api/wingdi/ns-wingdi-display_devicew
#[derive(Copy, Clone, PartialEq, Eq)]
#[repr(transparent)]
#[doc(alias = "DISPLAY_DEVICEW")]
pub(crate) struct DisplayDevice {
    info: DISPLAY_DEVICEW,
}

impl DisplayDevice {
    /// The first monitor attached to the display named `name`,
    /// with its device interface path in place of the device id
    #[doc(alias = "EnumDisplayDevicesW")]
    pub fn monitor_interface(name: &WideCStr) -> Option<Self> {
        Self::win32_enum(Some(name), 0, EDD_GET_DEVICE_INTERFACE_NAME).map(Self::from_win32)
    }

    /// The device id, or interface path when enumerated with
    /// `EDD_GET_DEVICE_INTERFACE_NAME`
    pub fn id<'a>(&'a self) -> impl Display + Debug + 'a {
        self.win32_id().display()
    }

    pub const fn from_win32(info: DISPLAY_DEVICEW) -> Self {
        Self { info }
    }

    pub fn win32_id(&self) -> &WideStr {
        wide_str_from_slice_truncated(&self.info.DeviceID)
    }

    pub fn win32_name(&self) -> &WideStr {
        wide_str_from_slice_truncated(&self.info.DeviceName)
    }

    #[doc(alias = "EnumDisplayDevicesW")]
    pub fn win32_enum(name: Option<&WideCStr>, index: u32, flags: u32) -> Option<DISPLAY_DEVICEW> {
        let mut info = DISPLAY_DEVICEW::default();
        info.cb = mem::size_of::<DISPLAY_DEVICEW>() as u32;
        unsafe { EnumDisplayDevicesW(name.map(|s| PCWSTR(s.as_ptr())), index, &mut info, flags) }
            .ok()
            .map(|()| info)
            .ok()
    }
}

impl Debug for DisplayDevice {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("DisplayDevice")
            .field("id", &self.win32_id())
            .field("name", &self.win32_name())
            .finish()
    }
}

/// The Windows [CCD][ccd] display configuration
///
/// [ccd]: https://learn.microsoft.com/en-us/windows-hardware/drivers/display/ccd-apis
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowsDisplayConfig;

impl WindowsDisplayConfig {
    /// Active display paths, sized by one `GetDisplayConfigBufferSizes` call
    #[doc(alias = "QueryDisplayConfig")]
    pub fn win32_query_display_config() -> WinResult<Vec<DISPLAYCONFIG_PATH_INFO>> {
        let flags = QDC_ONLY_ACTIVE_PATHS | QDC_VIRTUAL_MODE_AWARE;
        let mut path_count = 0;
        let mut mode_count = 0;
        let res = unsafe { GetDisplayConfigBufferSizes(flags, &mut path_count, &mut mode_count) };
        if res != ERROR_SUCCESS {
            return Err(win32_error(res, &"GetDisplayConfigBufferSizes"))
        }

        let mut paths = vec![DISPLAYCONFIG_PATH_INFO::default(); path_count as usize];
        let mut modes = vec![DISPLAYCONFIG_MODE_INFO::default(); mode_count as usize];
        let res = unsafe {
            QueryDisplayConfig(
                flags,
                &mut path_count,
                paths.as_mut_ptr(),
                &mut mode_count,
                modes.as_mut_ptr(),
                None,
            )
        };
        if res != ERROR_SUCCESS {
            return Err(win32_error(res, &"QueryDisplayConfig"))
        }
        paths.truncate(path_count as usize);
        Ok(paths)
    }

    #[doc(alias = "DisplayConfigGetDeviceInfo")]
    pub fn win32_target_name(path: &DISPLAYCONFIG_PATH_INFO) -> WinResult<DISPLAYCONFIG_TARGET_DEVICE_NAME> {
        let mut name = DISPLAYCONFIG_TARGET_DEVICE_NAME::default();
        name.header.r#type = DISPLAYCONFIG_DEVICE_INFO_GET_TARGET_NAME;
        name.header.size = mem::size_of::<DISPLAYCONFIG_TARGET_DEVICE_NAME>() as u32;
        name.header.adapterId = path.targetInfo.adapterId;
        name.header.id = path.targetInfo.id;
        let res = unsafe { DisplayConfigGetDeviceInfo(&mut name.header) };
        match res {
            0 => Ok(name),
            code => Err(win32_error(
                WIN32_ERROR(code as u32),
                &format_args!("DisplayConfigGetDeviceInfo target={}", path.targetInfo.id),
            )),
        }
    }
}

impl From<&DISPLAYCONFIG_TARGET_DEVICE_NAME> for TargetDeviceName {
    fn from(name: &DISPLAYCONFIG_TARGET_DEVICE_NAME) -> Self {
        let flags = unsafe { name.flags.Anonymous.value };
        TargetDeviceName {
            monitor_device_path: wide_str_from_slice_truncated(&name.monitorDevicePath).to_string_lossy(),
            friendly_name: wide_str_from_slice_truncated(&name.monitorFriendlyDeviceName).to_string_lossy(),
            friendly_name_from_edid: flags & FRIENDLY_NAME_FROM_EDID != 0,
        }
    }
}

fn os_error(call: &'static str) -> impl Fn(windows::core::Error) -> Error {
    move |e| Error::Os {
        call,
        message: e.to_string(),
    }
}

impl OsDisplayConfig for WindowsDisplayConfig {
    fn target_device_names(&self) -> Result<Vec<Result<TargetDeviceName>>> {
        let paths = Self::win32_query_display_config().map_err(os_error("QueryDisplayConfig"))?;
        Ok(paths
            .iter()
            .map(|path| {
                Self::win32_target_name(path)
                    .map(|name| TargetDeviceName::from(&name))
                    .map_err(os_error("DisplayConfigGetDeviceInfo"))
            })
            .collect())
    }

    fn monitor_interface_path(&self, display_name: &str) -> Option<String> {
        let name = WideCString::from_str(display_name).ok()?;
        match DisplayDevice::monitor_interface(&name) {
            Some(monitor) => {
                trace!("{display_name}: {monitor:?}");
                Some(monitor.id().to_string())
            },
            None => {
                debug!("EnumDisplayDevicesW({display_name}) found no monitor");
                None
            },
        }
    }
}
