//! Normalized view of the driver's display topology.
//!
//! Categorical fields keep the driver's raw code in a transparent newtype so
//! values this crate does not know about still reach the report intact.

macro_rules! driver_code {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(code: u32) -> Self {
                $name(code)
            }
        }
    };
}

driver_code! {
    /// `NV_DP_LINK_RATE`: per-lane link rate in units of 0.27 Gbps
    LinkRate
}

#[allow(missing_docs)]
impl LinkRate {
    pub const DP_1_62GBPS: Self = LinkRate(0x06);
    pub const EDP_2_16GBPS: Self = LinkRate(0x08);
    pub const EDP_2_43GBPS: Self = LinkRate(0x09);
    pub const DP_2_70GBPS: Self = LinkRate(0x0A);
    pub const EDP_3_24GBPS: Self = LinkRate(0x0C);
    pub const EDP_4_32GBPS: Self = LinkRate(0x10);
    pub const DP_5_40GBPS: Self = LinkRate(0x14);
    pub const DP_8_10GBPS: Self = LinkRate(0x1E);
}

driver_code! {
    /// `NV_DP_COLOR_FORMAT`
    ColorFormat
}

#[allow(missing_docs)]
impl ColorFormat {
    pub const RGB: Self = ColorFormat(0);
    pub const YCBCR422: Self = ColorFormat(1);
    pub const YCBCR444: Self = ColorFormat(2);
}

driver_code! {
    /// `NV_DP_COLORIMETRY`
    Colorimetry
}

#[allow(missing_docs)]
impl Colorimetry {
    pub const RGB: Self = Colorimetry(0);
    pub const YCBCR_ITU601: Self = Colorimetry(1);
    pub const YCBCR_ITU709: Self = Colorimetry(2);
}

driver_code! {
    /// `NV_DP_BPC` / `NV_BPC`
    Bpc
}

#[allow(missing_docs)]
impl Bpc {
    pub const DEFAULT: Self = Bpc(0);
    pub const BPC_6: Self = Bpc(1);
    pub const BPC_8: Self = Bpc(2);
    pub const BPC_10: Self = Bpc(3);
    pub const BPC_12: Self = Bpc(4);
    pub const BPC_16: Self = Bpc(5);
}

driver_code! {
    /// `NV_FORMAT` of the desktop surface
    SourceFormat
}

#[allow(missing_docs)]
impl SourceFormat {
    pub const UNKNOWN: Self = SourceFormat(0);
    pub const A8R8G8B8: Self = SourceFormat(21);
    pub const R5G6B5: Self = SourceFormat(23);
    pub const P8: Self = SourceFormat(41);
    pub const A16B16G16R16F: Self = SourceFormat(113);
}

driver_code! {
    /// `NV_GPU_CONNECTOR_TYPE`
    ConnectorType
}

#[allow(missing_docs)]
impl ConnectorType {
    pub const VGA_15_PIN: Self = ConnectorType(0x00);
    /// Shared by every composite TV connector variant
    pub const TV_COMPOSITE: Self = ConnectorType(0x10);
    pub const TV_S_VIDEO: Self = ConnectorType(0x11);
    pub const TV_SVIDEO_BREAKOUT_COMPOSITE: Self = ConnectorType(0x13);
    pub const TV_HDTV_COMPONENT: Self = ConnectorType(0x14);
    pub const TV_SCART: Self = ConnectorType(0x17);
    pub const DVI_I_TV_SVIDEO: Self = ConnectorType(0x20);
    pub const DVI_I_TV_COMPOSITE: Self = ConnectorType(0x21);
    pub const DVI_I: Self = ConnectorType(0x30);
    pub const DVI_D: Self = ConnectorType(0x31);
    pub const ADC: Self = ConnectorType(0x32);
    pub const LFH_DVI_I_1: Self = ConnectorType(0x38);
    pub const LFH_DVI_I_2: Self = ConnectorType(0x39);
    pub const SPWG: Self = ConnectorType(0x40);
    pub const OEM: Self = ConnectorType(0x41);
    pub const DISPLAYPORT_EXTERNAL: Self = ConnectorType(0x46);
    pub const DISPLAYPORT_INTERNAL: Self = ConnectorType(0x47);
    pub const DISPLAYPORT_MINI_EXT: Self = ConnectorType(0x48);
    pub const HDMI_A: Self = ConnectorType(0x61);
    pub const HDMI_C_MINI: Self = ConnectorType(0x63);
    pub const LFH_DISPLAYPORT_1: Self = ConnectorType(0x64);
    pub const LFH_DISPLAYPORT_2: Self = ConnectorType(0x65);
    pub const VIRTUAL_WFD: Self = ConnectorType(0x70);
    pub const USB_C: Self = ConnectorType(0x71);
    pub const UNKNOWN: Self = ConnectorType(0xFFFF_FFFF);
}

driver_code! {
    /// `NV_HDR_MODE`
    HdrMode
}

#[allow(missing_docs)]
impl HdrMode {
    pub const OFF: Self = HdrMode(0);
    pub const UHDA: Self = HdrMode(2);
    pub const EDR: Self = HdrMode(3);
    pub const SDR: Self = HdrMode(4);
    pub const UHDA_PASSTHROUGH: Self = HdrMode(5);
    pub const UHDA_NB: Self = HdrMode(6);
    pub const DOLBY_VISION: Self = HdrMode(7);
}

driver_code! {
    /// `NV_SCALING`
    Scaling
}

#[allow(missing_docs)]
impl Scaling {
    pub const DEFAULT: Self = Scaling(0);
    pub const GPU_SCALING_TO_CLOSEST: Self = Scaling(1);
    pub const GPU_SCALING_TO_NATIVE: Self = Scaling(2);
    pub const GPU_SCANOUT_TO_NATIVE: Self = Scaling(3);
    pub const GPU_SCALING_TO_ASPECT_SCANOUT_TO_NATIVE: Self = Scaling(5);
    pub const GPU_SCALING_TO_ASPECT_SCANOUT_TO_CLOSEST: Self = Scaling(6);
    pub const GPU_SCANOUT_TO_CLOSEST: Self = Scaling(7);
    pub const GPU_INTEGER_ASPECT_SCALING: Self = Scaling(8);
}

driver_code! {
    /// `NV_ROTATE`
    Rotation
}

#[allow(missing_docs)]
impl Rotation {
    pub const R0: Self = Rotation(0);
    pub const R90: Self = Rotation(1);
    pub const R180: Self = Rotation(2);
    pub const R270: Self = Rotation(3);
    pub const IGNORED: Self = Rotation(4);
}

/// One output route from a GPU source to its targets
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayPath {
    /// Driver source id
    pub source_id: u32,
    /// The desktop surface scanned out on this path
    pub source: SourceMode,
    /// Attached displays, more than one when cloned
    pub targets: Vec<Target>,
}

/// Desktop surface of a [`DisplayPath`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMode {
    /// Horizontal resolution
    pub width: u32,
    /// Vertical resolution
    pub height: u32,
    /// Bits per pixel
    pub color_depth: u32,
    /// Pixel format
    pub format: SourceFormat,
}

/// A monitor attached to a [`DisplayPath`]
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    /// NVAPI display id, only stable within the current driver session
    pub display_id: u32,
    /// Mode driven on the target
    pub details: TargetDetails,
}

/// The mode driven on a [`Target`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetDetails {
    /// Refresh rate in millihertz
    pub refresh_rate_1k: u32,
    /// Scaling mode
    pub scaling: Scaling,
    /// Desktop rotation
    pub rotation: Rotation,
    /// Physical connector
    pub connector: ConnectorType,
    /// Active timing
    pub timing: Timing,
}

impl TargetDetails {
    /// Refresh rate in Hz
    pub fn refresh_rate(&self) -> f64 {
        self.refresh_rate_1k as f64 / 1000.0
    }
}

/// Detailed display timing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    /// Horizontal timing
    pub horizontal: TimingAxis,
    /// Vertical timing
    pub vertical: TimingAxis,
    /// Interlaced rather than progressive scan
    pub interlaced: bool,
    /// Pixel clock in 10 kHz units
    pub pclk: u32,
    /// Timing standard name reported by the driver, e.g. `CVT-RB`
    pub name: String,
}

impl Timing {
    /// Pixel clock in MHz
    pub fn pixel_clock_mhz(&self) -> f64 {
        self.pclk as f64 * 0.01
    }
}

/// One direction of a [`Timing`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingAxis {
    /// Active pixels or lines
    pub visible: u16,
    /// Blanking
    pub border: u16,
    /// Front porch
    pub front_porch: u16,
    /// Sync pulse width
    pub sync_width: u16,
    /// Total pixels or lines
    pub total: u16,
    /// Sync pulse is active low
    pub sync_negative: bool,
}

bitflags::bitflags! {
    /// Capability bits of `NV_DISPLAY_PORT_INFO`
    #[derive(Default)]
    pub struct DisplayPortFlags: u32 {
        #[allow(missing_docs)]
        const IS_DP = 1 << 0;
        #[allow(missing_docs)]
        const IS_INTERNAL_DP = 1 << 1;
        #[allow(missing_docs)]
        const COLOR_CTRL_SUPPORTED = 1 << 2;
        #[allow(missing_docs)]
        const BPC_6_SUPPORTED = 1 << 3;
        #[allow(missing_docs)]
        const BPC_8_SUPPORTED = 1 << 4;
        #[allow(missing_docs)]
        const BPC_10_SUPPORTED = 1 << 5;
        #[allow(missing_docs)]
        const BPC_12_SUPPORTED = 1 << 6;
        #[allow(missing_docs)]
        const BPC_16_SUPPORTED = 1 << 7;
        #[allow(missing_docs)]
        const YCBCR420_SUPPORTED = 1 << 8;
        #[allow(missing_docs)]
        const YCBCR422_SUPPORTED = 1 << 9;
        #[allow(missing_docs)]
        const YCBCR444_SUPPORTED = 1 << 10;
    }
}

/// DisplayPort link state of a target
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayPortInfo {
    /// Sink DPCD revision, BCD encoded (`0x14` is 1.4)
    pub dpcd_version: u32,
    /// Negotiated per-lane rate
    pub current_link_rate: LinkRate,
    /// Negotiated lane count
    pub current_lane_count: u32,
    /// Highest rate supported by the link
    pub max_link_rate: LinkRate,
    /// Highest lane count supported by the link
    pub max_lane_count: u32,
    /// Current pixel encoding
    pub color_format: ColorFormat,
    /// Current colorimetry
    pub colorimetry: Colorimetry,
    /// Current bits per component
    pub bpc: Bpc,
    /// Capability bits
    pub flags: DisplayPortFlags,
}

impl DisplayPortInfo {
    /// Whether the target is actually driven over DisplayPort
    pub fn is_dp(&self) -> bool {
        self.flags.contains(DisplayPortFlags::IS_DP)
    }
}

bitflags::bitflags! {
    /// Support bits of `NV_HDR_CAPABILITIES`
    #[derive(Default)]
    pub struct HdrCapabilityFlags: u32 {
        /// HDMI 2.0a ST.2084 EOTF
        const ST2084_EOTF = 1 << 0;
        /// HDMI 2.0a traditional HDR gamma
        const TRADITIONAL_HDR_GAMMA = 1 << 1;
        /// Extended dynamic range on SDR displays
        const EDR = 1 << 2;
        /// Request flag, not a capability
        const DRIVER_EXPAND_DEFAULT_HDR_PARAMETERS = 1 << 3;
        #[allow(missing_docs)]
        const TRADITIONAL_SDR_GAMMA = 1 << 4;
        #[allow(missing_docs)]
        const DOLBY_VISION = 1 << 5;
        #[allow(missing_docs)]
        const HDR10_PLUS = 1 << 6;
        #[allow(missing_docs)]
        const HDR10_PLUS_GAMING = 1 << 7;

        /// Every actual capability bit
        const SUPPORTED = Self::ST2084_EOTF.bits
            | Self::TRADITIONAL_HDR_GAMMA.bits
            | Self::EDR.bits
            | Self::TRADITIONAL_SDR_GAMMA.bits
            | Self::DOLBY_VISION.bits
            | Self::HDR10_PLUS.bits
            | Self::HDR10_PLUS_GAMING.bits;
    }
}

/// HDR support advertised by a target
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HdrCapabilities {
    /// Capability bits
    pub flags: HdrCapabilityFlags,
    /// Desired content minimum luminance in 0.0001 nit units
    pub min_luminance: u16,
    /// Desired content maximum luminance in nits
    pub max_luminance: u16,
    /// Desired content maximum frame average luminance in nits
    pub max_frame_average_luminance: u16,
    /// Dolby Vision metadata, meaningful when supported
    pub dolby_vision: DolbyVisionMetadata,
}

impl HdrCapabilities {
    /// Whether any HDR mode at all is supported
    pub fn any_supported(&self) -> bool {
        self.flags.intersects(HdrCapabilityFlags::SUPPORTED)
    }

    /// Whether the display advertises `flag`
    pub fn supports(&self, flag: HdrCapabilityFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// Dolby Vision static metadata of a target
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DolbyVisionMetadata {
    /// 0.0001 nit units
    pub target_min_luminance: u16,
    /// nits
    pub target_max_luminance: u16,
    /// Target primaries are DCI-P3 rather than Rec.709
    pub dci_p3: bool,
}

/// Current HDR output state of a target
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HdrColorData {
    /// Active HDR mode
    pub mode: HdrMode,
    /// Current bits per component
    pub bpc: Bpc,
}
