use crate::{
    model::{DisplayPath, DisplayPortInfo, HdrCapabilities, HdrColorData},
    Result,
};

/// An opaque `NvDisplayHandle`
///
/// Only meaningful to the [`DisplayDriver`] that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
#[doc(alias = "NvDisplayHandle")]
pub struct DisplayHandle(pub usize);

/// The vendor driver's display query interface
///
/// Implemented by [`Session`](crate::Session) on top of NVAPI. Every method
/// is a single blocking query; nothing is cached between calls.
pub trait DisplayDriver {
    /// The active display paths with their targets and modes
    ///
    /// Failure here is fatal to the report.
    #[doc(alias = "NvAPI_DISP_GetDisplayConfig")]
    fn display_paths(&self) -> Result<Vec<DisplayPath>>;

    /// The display handle at `index`, or `None` past the last one
    #[doc(alias = "NvAPI_EnumNvidiaDisplayHandle")]
    fn display_handle(&self, index: u32) -> Result<Option<DisplayHandle>>;

    /// The Windows display name (`\\.\DISPLAYn`) associated with `handle`
    #[doc(alias = "NvAPI_GetAssociatedNvidiaDisplayName")]
    fn associated_display_name(&self, handle: DisplayHandle) -> Result<String>;

    /// The display id the driver associates with a Windows display name
    #[doc(alias = "NvAPI_DISP_GetDisplayIdByDisplayName")]
    fn display_id_by_name(&self, name: &str) -> Result<u32>;

    /// Link rate, lane count and color settings of a DisplayPort target
    #[doc(alias = "NvAPI_GetDisplayPortInfo")]
    fn display_port_info(&self, display_id: u32) -> Result<DisplayPortInfo>;

    /// HDR features and mastering metadata the display advertises
    #[doc(alias = "NvAPI_Disp_GetHdrCapabilities")]
    fn hdr_capabilities(&self, display_id: u32) -> Result<HdrCapabilities>;

    /// The current HDR output state
    #[doc(alias = "NvAPI_Disp_HdrColorControl")]
    fn hdr_color_data(&self, display_id: u32) -> Result<HdrColorData>;
}
