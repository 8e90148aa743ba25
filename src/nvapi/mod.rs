//! [NVAPI][nvapi]: the NVIDIA driver's display query interface
//!
//! [`sys`] holds the raw records; the conversions here turn them into the
//! crate's [model](crate::model). [`Session`] loads the driver library
//! (Windows only) and implements [`DisplayDriver`](crate::DisplayDriver).
//!
//! [nvapi]: https://developer.nvidia.com/rtx/path-tracing/nvapi/get-started

pub use self::{session::Session, status::Status};
use {
    crate::model::{
        Bpc, ColorFormat, Colorimetry, ConnectorType, DisplayPath, DisplayPortFlags, DisplayPortInfo,
        DolbyVisionMetadata, HdrCapabilities, HdrCapabilityFlags, HdrColorData, HdrMode, LinkRate, Rotation,
        Scaling, SourceFormat, SourceMode, Target, TargetDetails, Timing, TimingAxis,
    },
    crate::Result,
    log::warn,
    std::{ffi::CStr, ptr},
    sys::Versioned,
};

mod session;
mod status;
pub mod sys;

/// `NvAPI_ShortString` and `NV_TIMINGEXT::name` are NUL padded ASCII
pub(crate) fn short_string(raw: &[u8]) -> String {
    match CStr::from_bytes_until_nul(raw) {
        Ok(s) => s.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(raw).into_owned(),
    }
}

impl From<&sys::NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1> for SourceMode {
    fn from(raw: &sys::NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1) -> Self {
        SourceMode {
            width: raw.resolution.width,
            height: raw.resolution.height,
            color_depth: raw.resolution.colorDepth,
            format: SourceFormat(raw.colorFormat),
        }
    }
}

impl From<&sys::NV_TIMING> for Timing {
    fn from(raw: &sys::NV_TIMING) -> Self {
        Timing {
            horizontal: TimingAxis {
                visible: raw.HVisible,
                border: raw.HBorder,
                front_porch: raw.HFrontPorch,
                sync_width: raw.HSyncWidth,
                total: raw.HTotal,
                sync_negative: raw.HSyncPol != 0,
            },
            vertical: TimingAxis {
                visible: raw.VVisible,
                border: raw.VBorder,
                front_porch: raw.VFrontPorch,
                sync_width: raw.VSyncWidth,
                total: raw.VTotal,
                sync_negative: raw.VSyncPol != 0,
            },
            interlaced: raw.interlaced != 0,
            pclk: raw.pclk,
            name: short_string(&raw.etc.name),
        }
    }
}

impl From<&sys::NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO> for TargetDetails {
    fn from(raw: &sys::NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO) -> Self {
        TargetDetails {
            refresh_rate_1k: raw.refreshRate1K,
            scaling: Scaling(raw.scaling),
            rotation: Rotation(raw.rotation),
            connector: ConnectorType(raw.connector),
            timing: (&raw.timing).into(),
        }
    }
}

/// Assemble a [`DisplayPath`] from the buffers filled by the final
/// `NvAPI_DISP_GetDisplayConfig` call
pub(crate) fn display_path(
    raw: &sys::NV_DISPLAYCONFIG_PATH_INFO_V2,
    source: &sys::NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1,
    targets: &[sys::NV_DISPLAYCONFIG_PATH_TARGET_INFO_V2],
    details: &[sys::NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO],
) -> DisplayPath {
    DisplayPath {
        source_id: raw.sourceId,
        source: source.into(),
        targets: targets
            .iter()
            .zip(details)
            .map(|(target, details)| Target {
                display_id: target.displayId,
                details: details.into(),
            })
            .collect(),
    }
}

/// The three-pass `NvAPI_DISP_GetDisplayConfig` protocol
///
/// `get_display_config` performs one raw call. Each pass is handed the
/// number of records actually allocated, whatever count the driver wrote
/// back on the previous pass.
pub(crate) fn display_config<F>(mut get_display_config: F) -> Result<Vec<DisplayPath>>
where
    F: FnMut(&mut u32, *mut sys::NV_DISPLAYCONFIG_PATH_INFO_V2) -> Result<()>,
{
    // first pass: number of paths
    let mut count = 0;
    get_display_config(&mut count, ptr::null_mut())?;

    // second pass: target count of every path
    let mut paths = vec![sys::NV_DISPLAYCONFIG_PATH_INFO_V2::versioned(); count as usize];
    get_display_config(&mut count, paths.as_mut_ptr())?;
    paths.truncate(count as usize);

    // third pass: the driver fills the buffers hung off each path
    let mut sources = vec![sys::NV_DISPLAYCONFIG_SOURCE_MODE_INFO_V1::default(); paths.len()];
    let mut targets: Vec<Vec<sys::NV_DISPLAYCONFIG_PATH_TARGET_INFO_V2>> = paths
        .iter()
        .map(|path| vec![Default::default(); path.targetInfoCount as usize])
        .collect();
    let mut details: Vec<Vec<sys::NV_DISPLAYCONFIG_PATH_ADVANCED_TARGET_INFO>> = paths
        .iter()
        .map(|path| vec![Versioned::versioned(); path.targetInfoCount as usize])
        .collect();
    for (((path, source), targets), details) in paths
        .iter_mut()
        .zip(&mut sources)
        .zip(&mut targets)
        .zip(&mut details)
    {
        for (target, details) in targets.iter_mut().zip(details.iter_mut()) {
            target.details = details;
        }
        // no reborrows of `targets` past this point
        path.targetInfo = targets.as_mut_ptr();
        path.sourceModeInfo = source;
    }
    let mut count = paths.len() as u32;
    get_display_config(&mut count, paths.as_mut_ptr())?;
    paths.truncate(count as usize);

    Ok(paths
        .iter()
        .zip(&sources)
        .zip(targets.iter().zip(&details))
        .filter_map(|((path, source), (targets, details))| {
            let len = (path.targetInfoCount as usize).min(targets.len());
            match len {
                0 => {
                    warn!("display path #{} reported no targets", path.sourceId);
                    None
                },
                len => Some(display_path(path, source, &targets[..len], &details[..len])),
            }
        })
        .collect())
}

impl From<&sys::NV_DISPLAY_PORT_INFO_V1> for DisplayPortInfo {
    fn from(raw: &sys::NV_DISPLAY_PORT_INFO_V1) -> Self {
        DisplayPortInfo {
            dpcd_version: raw.dpcd_ver,
            current_link_rate: LinkRate(raw.curLinkRate),
            current_lane_count: raw.curLaneCount,
            max_link_rate: LinkRate(raw.maxLinkRate),
            max_lane_count: raw.maxLaneCount,
            color_format: ColorFormat(raw.colorFormat),
            colorimetry: Colorimetry(raw.colorimetry),
            bpc: Bpc(raw.bpc),
            flags: DisplayPortFlags::from_bits_truncate(raw.bits),
        }
    }
}

impl From<&sys::NV_HDR_CAPABILITIES_V3> for HdrCapabilities {
    fn from(raw: &sys::NV_HDR_CAPABILITIES_V3) -> Self {
        let dv = &raw.dv_static_metadata;
        HdrCapabilities {
            flags: HdrCapabilityFlags::from_bits_truncate(raw.bits),
            min_luminance: raw.display_data.desired_content_min_luminance,
            max_luminance: raw.display_data.desired_content_max_luminance,
            max_frame_average_luminance: raw.display_data.desired_content_max_frame_average_luminance,
            dolby_vision: DolbyVisionMetadata {
                target_min_luminance: dv.target_min_luminance,
                target_max_luminance: dv.target_max_luminance,
                dci_p3: dv.bits >> sys::NV_DV_STATIC_METADATA_COLORIMETRY_SHIFT & 1 != 0,
            },
        }
    }
}

impl From<&sys::NV_HDR_COLOR_DATA_V2> for HdrColorData {
    fn from(raw: &sys::NV_HDR_COLOR_DATA_V2) -> Self {
        HdrColorData {
            mode: HdrMode(raw.hdrMode),
            bpc: Bpc(raw.hdrBpc),
        }
    }
}
