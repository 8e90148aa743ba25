#![allow(missing_docs, non_snake_case, non_camel_case_types)]
//! Raw `nvapi.h` records and entry points used by this crate.
//!
//! Layouts follow the R470+ public headers. Bitfield words are kept as
//! plain `u32`s and decoded by the normalizing conversions in the parent
//! module.

use {
    super::Status,
    std::{ffi::c_void, mem},
};

pub type NvU8 = u8;
pub type NvU16 = u16;
pub type NvU32 = u32;
pub type NvS32 = i32;
pub type NvDisplayHandle = *mut c_void;

pub const NVAPI_SHORT_STRING_MAX: usize = 64;
pub type NvAPI_ShortString = [u8; NVAPI_SHORT_STRING_MAX];

/// `MAKE_NVAPI_VERSION(T, ver)`
pub const fn make_nvapi_version<T>(ver: u32) -> u32 {
    mem::size_of::<T>() as u32 | ver << 16
}

macro_rules! zeroed_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    // plain old data: integers, arrays and nullable pointers
                    unsafe { mem::zeroed() }
                }
            }
        )*
    };
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_RESOLUTION {
    pub width: NvU32,
    pub height: NvU32,
    pub colorDepth: NvU32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_POSITION {
    pub x: NvS32,
    pub y: NvS32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1 {
    pub resolution: NV_RESOLUTION,
    pub colorFormat: NvU32,
    pub position: NV_POSITION,
    pub spanningOrientation: NvU32,
    /// `bGDIPrimary:1, bSLIFocus:1, reserved:30`
    pub bits: NvU32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_TIMINGEXT {
    pub flag: NvU32,
    pub rr: NvU16,
    pub rrx1k: NvU32,
    pub aspect: NvU32,
    pub rep: NvU16,
    pub status: NvU32,
    pub name: [NvU8; 40],
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_TIMING {
    pub HVisible: NvU16,
    pub HBorder: NvU16,
    pub HFrontPorch: NvU16,
    pub HSyncWidth: NvU16,
    pub HTotal: NvU16,
    pub HSyncPol: NvU8,
    pub VVisible: NvU16,
    pub VBorder: NvU16,
    pub VFrontPorch: NvU16,
    pub VSyncWidth: NvU16,
    pub VTotal: NvU16,
    pub VSyncPol: NvU8,
    pub interlaced: NvU16,
    /// 10 kHz units
    pub pclk: NvU32,
    pub etc: NV_TIMINGEXT,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO {
    pub version: NvU32,
    pub rotation: NvU32,
    pub scaling: NvU32,
    pub refreshRate1K: NvU32,
    /// `interlaced:1, primary:1, reservedBit1:1, disableVirtualModeSupport:1, isPreferredUnscaledTarget:1`
    pub bits: NvU32,
    pub connector: NvU32,
    pub tvFormat: NvU32,
    pub timingOverride: NvU32,
    pub timing: NV_TIMING,
}

pub const NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO_VER1: u32 =
    make_nvapi_version::<NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO>(1);

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DISPLAYCONFIG_PATH_TARGET_INFO_V2 {
    pub displayId: NvU32,
    pub details: *mut NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO,
    pub targetId: NvU32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DISPLAYCONFIG_PATH_INFO_V2 {
    pub version: NvU32,
    pub sourceId: NvU32,
    pub targetInfoCount: NvU32,
    pub targetInfo: *mut NV_DISPLAYCONFIG_PATH_TARGET_INFO_V2,
    pub sourceModeInfo: *mut NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1,
    /// `IsNonNVIDIAAdapter:1, reserved:31`
    pub bits: NvU32,
    pub pOSAdapterID: *mut c_void,
}

pub const NV_DISPLAYCONFIG_PATH_INFO_VER2: u32 = make_nvapi_version::<NV_DISPLAYCONFIG_PATH_INFO_V2>(2);

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DISPLAY_PORT_INFO_V1 {
    pub version: NvU32,
    pub dpcd_ver: NvU32,
    pub maxLinkRate: NvU32,
    pub maxLaneCount: NvU32,
    pub curLinkRate: NvU32,
    pub curLaneCount: NvU32,
    pub colorFormat: NvU32,
    pub dynamicRange: NvU32,
    pub colorimetry: NvU32,
    pub bpc: NvU32,
    /// `isDp:1, isInternalDp:1, isColorCtrlSupported:1, is6BPCSupported:1, ...`
    pub bits: NvU32,
}

pub const NV_DISPLAY_PORT_INFO_VER1: u32 = make_nvapi_version::<NV_DISPLAY_PORT_INFO_V1>(1);

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_HDR_DISPLAY_DATA {
    pub displayPrimary_x0: NvU16,
    pub displayPrimary_y0: NvU16,
    pub displayPrimary_x1: NvU16,
    pub displayPrimary_y1: NvU16,
    pub displayPrimary_x2: NvU16,
    pub displayPrimary_y2: NvU16,
    pub displayWhitePoint_x: NvU16,
    pub displayWhitePoint_y: NvU16,
    /// nits
    pub desired_content_max_luminance: NvU16,
    /// 0.0001 nits
    pub desired_content_min_luminance: NvU16,
    /// nits
    pub desired_content_max_frame_average_luminance: NvU16,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_DV_STATIC_METADATA {
    /// `VSVDB_version:3, dm_version:8, supports_2160p60hz:1, supports_YUV422_12bit:1,
    /// supports_global_dimming:1, colorimetry:1, ...`
    pub bits: NvU32,
    /// 0.0001 nits
    pub target_min_luminance: NvU16,
    /// nits
    pub target_max_luminance: NvU16,
    pub cc_red_x: NvU16,
    pub cc_red_y: NvU16,
    pub cc_green_x: NvU16,
    pub cc_green_y: NvU16,
    pub cc_blue_x: NvU16,
    pub cc_blue_y: NvU16,
    pub cc_white_x: NvU16,
    pub cc_white_y: NvU16,
}

pub const NV_DV_STATIC_METADATA_COLORIMETRY_SHIFT: u32 = 14;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_HDR_CAPABILITIES_V3 {
    pub version: NvU32,
    /// `isST2084EotfSupported:1, isTraditionalHdrGammaSupported:1, isEdrSupported:1,
    /// driverExpandDefaultHdrParameters:1, isTraditionalSdrGammaSupported:1,
    /// isDolbyVisionSupported:1, isHdr10PlusSupported:1, isHdr10PlusGamingSupported:1`
    pub bits: NvU32,
    pub static_metadata_descriptor_id: NvU32,
    pub display_data: NV_HDR_DISPLAY_DATA,
    pub dv_static_metadata: NV_DV_STATIC_METADATA,
    /// `application_version:2, full_frame_peak_luminance_index:2, peak_luminance_index:4`
    pub hdr10plus_vsvdb: NvU16,
}

pub const NV_HDR_CAPABILITIES_VER3: u32 = make_nvapi_version::<NV_HDR_CAPABILITIES_V3>(3);

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_HDR_MASTERING_DISPLAY_DATA {
    pub displayPrimary_x0: NvU16,
    pub displayPrimary_y0: NvU16,
    pub displayPrimary_x1: NvU16,
    pub displayPrimary_y1: NvU16,
    pub displayPrimary_x2: NvU16,
    pub displayPrimary_y2: NvU16,
    pub displayWhitePoint_x: NvU16,
    pub displayWhitePoint_y: NvU16,
    pub max_display_mastering_luminance: NvU16,
    pub min_display_mastering_luminance: NvU16,
    pub max_content_light_level: NvU16,
    pub max_frame_average_light_level: NvU16,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NV_HDR_COLOR_DATA_V2 {
    pub version: NvU32,
    pub cmd: NvU32,
    pub hdrMode: NvU32,
    pub static_metadata_descriptor_id: NvU32,
    pub mastering_display_data: NV_HDR_MASTERING_DISPLAY_DATA,
    pub hdrColorFormat: NvU32,
    pub hdrDynamicRange: NvU32,
    pub hdrBpc: NvU32,
}

pub const NV_HDR_COLOR_DATA_VER2: u32 = make_nvapi_version::<NV_HDR_COLOR_DATA_V2>(2);

pub const NV_HDR_CMD_GET: NvU32 = 0;

zeroed_default! {
    NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1,
    NV_TIMINGEXT,
    NV_TIMING,
    NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO,
    NV_DISPLAYCONFIG_PATH_TARGET_INFO_V2,
    NV_DISPLAYCONFIG_PATH_INFO_V2,
    NV_DISPLAY_PORT_INFO_V1,
    NV_HDR_CAPABILITIES_V3,
    NV_HDR_COLOR_DATA_V2,
}

/// Zeroed records with their `version` field already tagged
pub trait Versioned: Default {
    const VERSION: u32;

    fn versioned() -> Self;
}

macro_rules! versioned {
    ($($ty:ty => $ver:expr),* $(,)?) => {
        $(
            impl Versioned for $ty {
                const VERSION: u32 = $ver;

                fn versioned() -> Self {
                    Self {
                        version: Self::VERSION,
                        ..Default::default()
                    }
                }
            }
        )*
    };
}

versioned! {
    NV_DISPLAYCONFIG_PATH_INFO_V2 => NV_DISPLAYCONFIG_PATH_INFO_VER2,
    NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO => NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO_VER1,
    NV_DISPLAY_PORT_INFO_V1 => NV_DISPLAY_PORT_INFO_VER1,
    NV_HDR_CAPABILITIES_V3 => NV_HDR_CAPABILITIES_VER3,
    NV_HDR_COLOR_DATA_V2 => NV_HDR_COLOR_DATA_VER2,
}

/// `nvapi_QueryInterface` ids
pub mod interface {
    pub const NvAPI_Initialize: u32 = 0x0150_E828;
    pub const NvAPI_Unload: u32 = 0xD22B_DD7E;
    pub const NvAPI_GetErrorMessage: u32 = 0x6C2D_048C;
    pub const NvAPI_DISP_GetDisplayConfig: u32 = 0x11AB_CCF8;
    pub const NvAPI_EnumNvidiaDisplayHandle: u32 = 0x9ABD_D40D;
    pub const NvAPI_GetAssociatedNvidiaDisplayName: u32 = 0x22A7_8B05;
    pub const NvAPI_DISP_GetDisplayIdByDisplayName: u32 = 0xAE45_7190;
    pub const NvAPI_GetDisplayPortInfo: u32 = 0xC64F_F367;
    pub const NvAPI_Disp_GetHdrCapabilities: u32 = 0x84F2_A8DF;
    pub const NvAPI_Disp_HdrColorControl: u32 = 0x351D_A224;
}

pub type nvapi_QueryInterface = unsafe extern "C" fn(id: NvU32) -> *mut c_void;
pub type NvAPI_Initialize = unsafe extern "C" fn() -> Status;
pub type NvAPI_Unload = unsafe extern "C" fn() -> Status;
pub type NvAPI_GetErrorMessage = unsafe extern "C" fn(status: Status, text: *mut NvU8) -> Status;
pub type NvAPI_DISP_GetDisplayConfig =
    unsafe extern "C" fn(path_count: *mut NvU32, paths: *mut NV_DISPLAYCONFIG_PATH_INFO_V2) -> Status;
pub type NvAPI_EnumNvidiaDisplayHandle = unsafe extern "C" fn(index: NvU32, handle: *mut NvDisplayHandle) -> Status;
pub type NvAPI_GetAssociatedNvidiaDisplayName =
    unsafe extern "C" fn(handle: NvDisplayHandle, name: *mut NvU8) -> Status;
pub type NvAPI_DISP_GetDisplayIdByDisplayName =
    unsafe extern "C" fn(name: *const NvU8, display_id: *mut NvU32) -> Status;
pub type NvAPI_GetDisplayPortInfo = unsafe extern "C" fn(
    handle: NvDisplayHandle,
    output_id: NvU32,
    info: *mut NV_DISPLAY_PORT_INFO_V1,
) -> Status;
pub type NvAPI_Disp_GetHdrCapabilities =
    unsafe extern "C" fn(display_id: NvU32, caps: *mut NV_HDR_CAPABILITIES_V3) -> Status;
pub type NvAPI_Disp_HdrColorControl =
    unsafe extern "C" fn(display_id: NvU32, data: *mut NV_HDR_COLOR_DATA_V2) -> Status;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_tags_carry_size_and_revision() {
        let path = NV_DISPLAYCONFIG_PATH_INFO_V2::versioned();
        assert_eq!(path.version & 0xffff, mem::size_of::<NV_DISPLAYCONFIG_PATH_INFO_V2>() as u32);
        assert_eq!(path.version >> 16, 2);

        let details = NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO::versioned();
        assert_eq!(details.version >> 16, 1);
        assert_eq!(
            details.version & 0xffff,
            mem::size_of::<NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO>() as u32
        );

        assert_eq!(NV_HDR_CAPABILITIES_V3::versioned().version >> 16, 3);
        assert_eq!(NV_HDR_COLOR_DATA_V2::versioned().version >> 16, 2);
        assert_eq!(
            NV_DISPLAY_PORT_INFO_V1::versioned().version,
            mem::size_of::<NV_DISPLAY_PORT_INFO_V1>() as u32 | 1 << 16
        );
    }

    #[test]
    fn zeroed_records_have_null_buffers() {
        let path = NV_DISPLAYCONFIG_PATH_INFO_V2::default();
        assert!(path.targetInfo.is_null());
        assert!(path.sourceModeInfo.is_null());
        assert_eq!(path.targetInfoCount, 0);
    }
}
