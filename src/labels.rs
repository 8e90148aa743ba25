//! Human-readable names for the driver's categorical codes.
//!
//! Every code newtype in [`model`](crate::model) gets a `label()` and a
//! matching [`Display`] impl. Codes without a name render as
//! `unknown(<code>)`.

use {
    crate::model::{Colorimetry, ColorFormat, ConnectorType, HdrMode, LinkRate, Rotation, Scaling, SourceFormat},
    std::{
        borrow::Cow,
        fmt::{self, Display, Formatter},
    },
};

fn unknown(code: u32) -> Cow<'static, str> {
    Cow::Owned(format!("unknown({code})"))
}

macro_rules! labelled {
    ($($name:ident)*) => {
        $(
            impl Display for $name {
                fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                    f.write_str(&self.label())
                }
            }
        )*
    };
}

labelled! { LinkRate ColorFormat Colorimetry SourceFormat ConnectorType HdrMode Scaling Rotation }

impl LinkRate {
    /// e.g. `DP 5.4 Gbps (HBR2)`
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            LinkRate::DP_1_62GBPS => "DP 1.6 Gbps (RBR)",
            LinkRate::DP_2_70GBPS => "DP 2.7 Gbps (HBR)",
            LinkRate::DP_5_40GBPS => "DP 5.4 Gbps (HBR2)",
            LinkRate::DP_8_10GBPS => "DP 8.1 Gbps (HBR3)",
            LinkRate::EDP_2_16GBPS => "eDP 2.16 Gbps",
            LinkRate::EDP_2_43GBPS => "eDP 2.43 Gbps",
            LinkRate::EDP_3_24GBPS => "eDP 3.24 Gbps",
            LinkRate::EDP_4_32GBPS => "eDP 4.32 Gbps",
            LinkRate(code) => return unknown(code),
        })
    }
}

/// A link configuration, e.g. `DP 8.1 Gbps (HBR3) x 4 lanes`
pub fn dp_link(rate: LinkRate, lanes: u32) -> String {
    format!("{rate} x {lanes} lanes")
}

impl ColorFormat {
    /// e.g. `YCbCr (YUV) 4:2:2`
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            ColorFormat::RGB => "RGB",
            ColorFormat::YCBCR422 => "YCbCr (YUV) 4:2:2",
            ColorFormat::YCBCR444 => "YCbCr (YUV) 4:4:4",
            ColorFormat(code) => return unknown(code),
        })
    }
}

impl Colorimetry {
    /// Codes 8 and 9 are undocumented; sinks reporting them have so far
    /// been BT.2020 (YCbCr and RGB respectively).
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            Colorimetry::RGB => "sRGB",
            Colorimetry::YCBCR_ITU601 => "ITU.601",
            Colorimetry::YCBCR_ITU709 => "ITU.709",
            Colorimetry(8) | Colorimetry(9) => "Rec.2020?",
            Colorimetry(code) => return unknown(code),
        })
    }
}

impl SourceFormat {
    /// e.g. `32-bit (RGB888)`
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            SourceFormat::P8 => "8-bit (palette)",
            SourceFormat::R5G6B5 => "16-bit (RGB565)",
            SourceFormat::A8R8G8B8 => "32-bit (RGB888)",
            SourceFormat::A16B16G16R16F => "64-bit fp (RGBA half)",
            SourceFormat(code) => return unknown(code),
        })
    }
}

impl ConnectorType {
    /// Physical connector family
    ///
    /// Unlisted codes carrying the composite TV bit are reported as analog.
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            ConnectorType::VGA_15_PIN => "VGA",
            ConnectorType::DVI_I_TV_SVIDEO
            | ConnectorType::DVI_I_TV_COMPOSITE
            | ConnectorType::LFH_DVI_I_1
            | ConnectorType::LFH_DVI_I_2
            | ConnectorType::DVI_I => "DVI-I (analog)",
            ConnectorType::DVI_D => "DVI-D",
            ConnectorType::SPWG => "LVDS",
            ConnectorType::OEM => "OEM",
            ConnectorType::DISPLAYPORT_EXTERNAL
            | ConnectorType::DISPLAYPORT_MINI_EXT
            | ConnectorType::LFH_DISPLAYPORT_1
            | ConnectorType::LFH_DISPLAYPORT_2 => "DisplayPort",
            ConnectorType::HDMI_A | ConnectorType::HDMI_C_MINI => "HDMI",
            ConnectorType::VIRTUAL_WFD => "VirtualLink (USB-C)",
            ConnectorType::USB_C => "USB-C",
            ConnectorType(code) if code & ConnectorType::TV_COMPOSITE.0 != 0 => "Misc. analog",
            ConnectorType(code) => return unknown(code),
        })
    }
}

impl HdrMode {
    /// e.g. `HDR10 pass-thru`
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            HdrMode::OFF => "Off",
            HdrMode::UHDA => "UHDA (HDR10 w/ Rec.2020)",
            HdrMode::EDR => "EDR",
            HdrMode::SDR => "SDR",
            HdrMode::UHDA_PASSTHROUGH => "HDR10 pass-thru",
            HdrMode::UHDA_NB => "UHDA (notebook)",
            HdrMode::DOLBY_VISION => "DolbyVision",
            HdrMode(code) => return unknown(code),
        })
    }
}

impl Scaling {
    /// Names as the NVIDIA control panel words them
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            Scaling::DEFAULT => "uhm...?",
            Scaling::GPU_SCALING_TO_CLOSEST => "GPU / Balanced Full Screen",
            Scaling::GPU_SCALING_TO_NATIVE => "Force GPU scaling / Full Screen",
            Scaling::GPU_SCANOUT_TO_NATIVE => "No scaling (native resolution)",
            Scaling::GPU_SCANOUT_TO_CLOSEST => "No scaling (closest resolution)",
            Scaling::GPU_SCALING_TO_ASPECT_SCANOUT_TO_NATIVE => "Preserve aspect ratio (native resolution)",
            Scaling::GPU_SCALING_TO_ASPECT_SCANOUT_TO_CLOSEST => "Preserve aspect ratio (closest resolution)",
            Scaling::GPU_INTEGER_ASPECT_SCALING => "Integer scaling",
            Scaling(code) => return unknown(code),
        })
    }
}

impl Rotation {
    /// Clockwise rotation in degrees
    pub fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match *self {
            Rotation::R0 => "0°",
            Rotation::R90 => "90°",
            Rotation::R180 => "180°",
            Rotation::R270 => "270°",
            Rotation::IGNORED => "ignored",
            Rotation(code) => return unknown(code),
        })
    }
}
