use {
    super::{display_config, short_string, sys, sys::Versioned, Status},
    crate::{
        driver::{DisplayDriver, DisplayHandle},
        model::{DisplayPath, DisplayPortInfo, HdrCapabilities, HdrColorData},
        Error, Result,
    },
    log::debug,
    std::{
        ffi::CString,
        fmt::{self, Debug, Formatter},
        ptr,
    },
};
#[cfg(windows)]
use {
    log::trace,
    std::mem,
    widestring::{widecstr, WideCStr},
    windows::{
        core::{PCSTR, PCWSTR},
        Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW},
    },
};

#[cfg(all(windows, target_pointer_width = "64"))]
const NVAPI_LIBRARY: (&str, &WideCStr) = ("nvapi64.dll", widecstr!("nvapi64.dll"));
#[cfg(all(windows, not(target_pointer_width = "64")))]
const NVAPI_LIBRARY: (&str, &WideCStr) = ("nvapi.dll", widecstr!("nvapi.dll"));

/// Entry points resolved through `nvapi_QueryInterface`
#[cfg_attr(not(any(windows, test)), allow(dead_code))]
struct Api {
    unload: sys::NvAPI_Unload,
    get_error_message: Option<sys::NvAPI_GetErrorMessage>,
    get_display_config: sys::NvAPI_DISP_GetDisplayConfig,
    enum_display_handle: sys::NvAPI_EnumNvidiaDisplayHandle,
    get_associated_display_name: sys::NvAPI_GetAssociatedNvidiaDisplayName,
    get_display_id_by_display_name: sys::NvAPI_DISP_GetDisplayIdByDisplayName,
    get_display_port_info: sys::NvAPI_GetDisplayPortInfo,
    get_hdr_capabilities: sys::NvAPI_Disp_GetHdrCapabilities,
    hdr_color_control: sys::NvAPI_Disp_HdrColorControl,
}

#[cfg(windows)]
unsafe fn query<F: Copy>(query_interface: sys::nvapi_QueryInterface, id: u32, name: &'static str) -> Result<F> {
    debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*mut std::ffi::c_void>());
    let ptr = query_interface(id);
    match ptr.is_null() {
        true => Err(Error::EntryPoint { name }),
        false => Ok(mem::transmute_copy(&ptr)),
    }
}

#[cfg(windows)]
macro_rules! resolve {
    ($query_interface:expr, $name:ident) => {
        query::<sys::$name>($query_interface, sys::interface::$name, stringify!($name))
    };
}

impl Api {
    #[cfg(windows)]
    unsafe fn resolve(query_interface: sys::nvapi_QueryInterface) -> Result<(sys::NvAPI_Initialize, Self)> {
        let initialize = resolve!(query_interface, NvAPI_Initialize)?;
        let api = Api {
            unload: resolve!(query_interface, NvAPI_Unload)?,
            get_error_message: resolve!(query_interface, NvAPI_GetErrorMessage).ok(),
            get_display_config: resolve!(query_interface, NvAPI_DISP_GetDisplayConfig)?,
            enum_display_handle: resolve!(query_interface, NvAPI_EnumNvidiaDisplayHandle)?,
            get_associated_display_name: resolve!(query_interface, NvAPI_GetAssociatedNvidiaDisplayName)?,
            get_display_id_by_display_name: resolve!(query_interface, NvAPI_DISP_GetDisplayIdByDisplayName)?,
            get_display_port_info: resolve!(query_interface, NvAPI_GetDisplayPortInfo)?,
            get_hdr_capabilities: resolve!(query_interface, NvAPI_Disp_GetHdrCapabilities)?,
            hdr_color_control: resolve!(query_interface, NvAPI_Disp_HdrColorControl)?,
        };
        Ok((initialize, api))
    }

    #[doc(alias = "NvAPI_GetErrorMessage")]
    fn error_message(&self, status: Status) -> Option<String> {
        let get_error_message = self.get_error_message?;
        let mut text: sys::NvAPI_ShortString = [0; sys::NVAPI_SHORT_STRING_MAX];
        match unsafe { get_error_message(status, text.as_mut_ptr()) }.is_ok() {
            true => Some(short_string(&text)),
            false => None,
        }
    }

    fn check(&self, call: &'static str, status: Status) -> Result<()> {
        if status.is_ok() {
            return Ok(())
        }
        let message = self
            .error_message(status)
            .or_else(|| status.name().map(Into::into))
            .unwrap_or_else(|| "unrecognised status".into());
        Err(Error::Driver { call, status, message })
    }
}

/// An initialized NVAPI session
///
/// Created once per run; dropping it calls `NvAPI_Unload`. Only
/// [`Session::open`] is Windows specific.
pub struct Session {
    api: Api,
}

impl Session {
    /// Load the driver library and call `NvAPI_Initialize`
    #[cfg(windows)]
    #[doc(alias = "NvAPI_Initialize")]
    pub fn open() -> Result<Self> {
        let (name, wide_name) = NVAPI_LIBRARY;
        let library = unsafe { LoadLibraryW(PCWSTR(wide_name.as_ptr())) }.map_err(|e| {
            debug!("LoadLibraryW({name}): {e}");
            Error::Library { name }
        })?;

        let query_interface: sys::nvapi_QueryInterface =
            match unsafe { GetProcAddress(library, PCSTR(b"nvapi_QueryInterface\0".as_ptr())) } {
                Some(f) => unsafe { mem::transmute(f) },
                None => return Err(Error::EntryPoint { name: "nvapi_QueryInterface" }),
            };

        let (initialize, api) = unsafe { Api::resolve(query_interface)? };
        let session = Self::initialize(initialize, api)?;
        trace!("{name} initialized");
        Ok(session)
    }

    /// Only a successful `NvAPI_Initialize` yields a session, and with it
    /// the matching `NvAPI_Unload`
    #[cfg_attr(not(any(windows, test)), allow(dead_code))]
    fn initialize(initialize: sys::NvAPI_Initialize, api: Api) -> Result<Self> {
        api.check("NvAPI_Initialize", unsafe { initialize() })?;
        Ok(Session { api })
    }

    /// The driver's description of `status`
    #[doc(alias = "NvAPI_GetErrorMessage")]
    pub fn error_message(&self, status: Status) -> Option<String> {
        self.api.error_message(status)
    }

    fn check(&self, call: &'static str, status: Status) -> Result<()> {
        self.api.check(call, status)
    }

    #[doc(alias = "NvAPI_DISP_GetDisplayConfig")]
    fn win32_get_display_config(&self, count: &mut u32, paths: *mut sys::NV_DISPLAYCONFIG_PATH_INFO_V2) -> Result<()> {
        self.check("NvAPI_DISP_GetDisplayConfig", unsafe {
            (self.api.get_display_config)(count, paths)
        })
    }
}

impl DisplayDriver for Session {
    fn display_paths(&self) -> Result<Vec<DisplayPath>> {
        display_config(|count, paths| self.win32_get_display_config(count, paths))
    }

    fn display_handle(&self, index: u32) -> Result<Option<DisplayHandle>> {
        let mut handle = ptr::null_mut();
        match unsafe { (self.api.enum_display_handle)(index, &mut handle) } {
            Status::END_ENUMERATION => Ok(None),
            status => self
                .check("NvAPI_EnumNvidiaDisplayHandle", status)
                .map(|()| Some(DisplayHandle(handle as usize))),
        }
    }

    fn associated_display_name(&self, handle: DisplayHandle) -> Result<String> {
        let mut name: sys::NvAPI_ShortString = [0; sys::NVAPI_SHORT_STRING_MAX];
        self.check("NvAPI_GetAssociatedNvidiaDisplayName", unsafe {
            (self.api.get_associated_display_name)(handle.0 as sys::NvDisplayHandle, name.as_mut_ptr())
        })?;
        Ok(short_string(&name))
    }

    fn display_id_by_name(&self, name: &str) -> Result<u32> {
        let name = CString::new(name)
            .map_err(|_| Error::driver("NvAPI_DISP_GetDisplayIdByDisplayName", Status::INVALID_ARGUMENT))?;
        let mut display_id = 0;
        self.check("NvAPI_DISP_GetDisplayIdByDisplayName", unsafe {
            (self.api.get_display_id_by_display_name)(name.as_ptr() as *const u8, &mut display_id)
        })?;
        Ok(display_id)
    }

    fn display_port_info(&self, display_id: u32) -> Result<DisplayPortInfo> {
        let mut info = sys::NV_DISPLAY_PORT_INFO_V1::versioned();
        self.check("NvAPI_GetDisplayPortInfo", unsafe {
            (self.api.get_display_port_info)(ptr::null_mut(), display_id, &mut info)
        })?;
        Ok((&info).into())
    }

    fn hdr_capabilities(&self, display_id: u32) -> Result<HdrCapabilities> {
        // driverExpandDefaultHdrParameters stays clear: report what the EDID says
        let mut caps = sys::NV_HDR_CAPABILITIES_V3::versioned();
        self.check("NvAPI_Disp_GetHdrCapabilities", unsafe {
            (self.api.get_hdr_capabilities)(display_id, &mut caps)
        })?;
        Ok((&caps).into())
    }

    fn hdr_color_data(&self, display_id: u32) -> Result<HdrColorData> {
        let mut data = sys::NV_HDR_COLOR_DATA_V2::versioned();
        data.cmd = sys::NV_HDR_CMD_GET;
        self.check("NvAPI_Disp_HdrColorControl", unsafe {
            (self.api.hdr_color_control)(display_id, &mut data)
        })?;
        Ok((&data).into())
    }
}

impl Drop for Session {
    #[doc(alias = "NvAPI_Unload")]
    fn drop(&mut self) {
        let status = unsafe { (self.api.unload)() };
        if !status.is_ok() {
            debug!("NvAPI_Unload: {status}");
        }
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    static UNLOADS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn unload() -> Status {
        UNLOADS.fetch_add(1, Ordering::SeqCst);
        Status::OK
    }

    unsafe extern "C" fn initialized() -> Status {
        Status::OK
    }

    unsafe extern "C" fn no_device() -> Status {
        Status::NVIDIA_DEVICE_NOT_FOUND
    }

    unsafe extern "C" fn get_display_config(_: *mut u32, _: *mut sys::NV_DISPLAYCONFIG_PATH_INFO_V2) -> Status {
        Status::API_NOT_INITIALIZED
    }

    unsafe extern "C" fn enum_display_handle(index: u32, handle: *mut sys::NvDisplayHandle) -> Status {
        match index {
            0 => {
                *handle = 0x40 as sys::NvDisplayHandle;
                Status::OK
            },
            _ => Status::END_ENUMERATION,
        }
    }

    unsafe extern "C" fn get_associated_display_name(_: sys::NvDisplayHandle, name: *mut u8) -> Status {
        let display = br"\\.\DISPLAY1";
        ptr::copy_nonoverlapping(display.as_ptr(), name, display.len());
        Status::OK
    }

    unsafe extern "C" fn get_display_id_by_display_name(_: *const u8, display_id: *mut u32) -> Status {
        *display_id = 0x8010_1000;
        Status::OK
    }

    unsafe extern "C" fn get_display_port_info(
        _: sys::NvDisplayHandle,
        _: u32,
        _: *mut sys::NV_DISPLAY_PORT_INFO_V1,
    ) -> Status {
        Status::NOT_SUPPORTED
    }

    unsafe extern "C" fn get_hdr_capabilities(_: u32, _: *mut sys::NV_HDR_CAPABILITIES_V3) -> Status {
        Status::NOT_SUPPORTED
    }

    unsafe extern "C" fn hdr_color_control(_: u32, _: *mut sys::NV_HDR_COLOR_DATA_V2) -> Status {
        Status::NOT_SUPPORTED
    }

    fn api() -> Api {
        Api {
            unload,
            get_error_message: None,
            get_display_config,
            enum_display_handle,
            get_associated_display_name,
            get_display_id_by_display_name,
            get_display_port_info,
            get_hdr_capabilities,
            hdr_color_control,
        }
    }

    #[test]
    fn unload_only_follows_successful_initialize() {
        let before = UNLOADS.load(Ordering::SeqCst);
        let e = Session::initialize(no_device, api()).unwrap_err();
        assert_eq!(e.status(), Some(Status::NVIDIA_DEVICE_NOT_FOUND));
        assert!(e.to_string().contains("NvAPI_Initialize"));
        assert_eq!(UNLOADS.load(Ordering::SeqCst), before);

        let session = Session::initialize(initialized, api()).unwrap();
        drop(session);
        assert_eq!(UNLOADS.load(Ordering::SeqCst), before + 1);
    }

    #[test]
    fn driver_calls_map_status() {
        let session = Session { api: api() };
        assert_eq!(session.display_handle(0).unwrap(), Some(DisplayHandle(0x40)));
        assert_eq!(session.display_handle(1).unwrap(), None);
        assert_eq!(session.associated_display_name(DisplayHandle(0x40)).unwrap(), r"\\.\DISPLAY1");
        assert_eq!(session.display_id_by_name(r"\\.\DISPLAY1").unwrap(), 0x8010_1000);

        let e = session.display_paths().unwrap_err();
        assert_eq!(e.status(), Some(Status::API_NOT_INITIALIZED));
        let e = session.hdr_capabilities(0x8010_1000).unwrap_err();
        assert!(e.to_string().contains("NVAPI_NOT_SUPPORTED"));
        // keep the shared unload counter untouched
        std::mem::forget(session);
    }
}
