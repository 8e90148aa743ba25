//! In-memory gateways for tests.

use {
    crate::{
        driver::{DisplayDriver, DisplayHandle},
        model::{
            ConnectorType, DisplayPath, DisplayPortInfo, HdrCapabilities, HdrColorData, Rotation, Scaling, SourceFormat,
            SourceMode, Target, TargetDetails, Timing, TimingAxis,
        },
        nvapi::Status,
        os::{OsDisplayConfig, TargetDeviceName},
        Error, Result,
    },
    std::{cell::Cell, collections::HashMap},
};

/// Scripted [`DisplayDriver`]
///
/// Handle `i` is `DisplayHandle(i + 1)`. A `None` entry in `handles` is a
/// handle whose name lookup fails; indices listed in `failing_indices` fail
/// to enumerate at all. Missing per-display entries fail with
/// `NVAPI_NOT_SUPPORTED`.
#[derive(Debug, Default)]
pub(crate) struct FakeDriver {
    pub paths: Vec<DisplayPath>,
    pub fail_paths: bool,
    pub handles: Vec<Option<String>>,
    pub failing_indices: Vec<u32>,
    pub ids_by_name: HashMap<String, u32>,
    pub port_info: HashMap<u32, DisplayPortInfo>,
    pub hdr_caps: HashMap<u32, HdrCapabilities>,
    pub hdr_color: HashMap<u32, HdrColorData>,
    pub handle_queries: Cell<usize>,
    pub id_lookups: Cell<usize>,
}

impl FakeDriver {
    /// One handle per `(display name, display id)` pair, in order
    pub fn with_displays(displays: &[(&str, u32)]) -> Self {
        FakeDriver {
            handles: displays.iter().map(|&(name, _)| Some(name.to_owned())).collect(),
            ids_by_name: displays.iter().map(|&(name, id)| (name.to_owned(), id)).collect(),
            ..Default::default()
        }
    }

    fn lookup<T: Copy>(map: &HashMap<u32, T>, call: &'static str, display_id: u32) -> Result<T> {
        map.get(&display_id)
            .copied()
            .ok_or_else(|| Error::driver(call, Status::NOT_SUPPORTED))
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl DisplayDriver for FakeDriver {
    fn display_paths(&self) -> Result<Vec<DisplayPath>> {
        match self.fail_paths {
            true => Err(Error::driver("NvAPI_DISP_GetDisplayConfig", Status::INCOMPATIBLE_STRUCT_VERSION)),
            false => Ok(self.paths.clone()),
        }
    }

    fn display_handle(&self, index: u32) -> Result<Option<DisplayHandle>> {
        bump(&self.handle_queries);
        if self.failing_indices.contains(&index) {
            return Err(Error::driver("NvAPI_EnumNvidiaDisplayHandle", Status::ERROR))
        }
        Ok(match (index as usize) < self.handles.len() {
            true => Some(DisplayHandle(index as usize + 1)),
            false => None,
        })
    }

    fn associated_display_name(&self, handle: DisplayHandle) -> Result<String> {
        self.handles
            .get(handle.0 - 1)
            .cloned()
            .flatten()
            .ok_or_else(|| Error::driver("NvAPI_GetAssociatedNvidiaDisplayName", Status::INVALID_HANDLE))
    }

    fn display_id_by_name(&self, name: &str) -> Result<u32> {
        bump(&self.id_lookups);
        self.ids_by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::driver("NvAPI_DISP_GetDisplayIdByDisplayName", Status::NVIDIA_DEVICE_NOT_FOUND))
    }

    fn display_port_info(&self, display_id: u32) -> Result<DisplayPortInfo> {
        Self::lookup(&self.port_info, "NvAPI_GetDisplayPortInfo", display_id)
    }

    fn hdr_capabilities(&self, display_id: u32) -> Result<HdrCapabilities> {
        Self::lookup(&self.hdr_caps, "NvAPI_Disp_GetHdrCapabilities", display_id)
    }

    fn hdr_color_data(&self, display_id: u32) -> Result<HdrColorData> {
        Self::lookup(&self.hdr_color, "NvAPI_Disp_HdrColorControl", display_id)
    }
}

/// Scripted [`OsDisplayConfig`]
///
/// `names: None` makes the listing fail; a `None` entry is a record whose
/// lookup fails.
#[derive(Debug, Default)]
pub(crate) struct FakeOs {
    pub names: Option<Vec<Option<TargetDeviceName>>>,
    pub interface_paths: HashMap<String, String>,
    pub queries: Cell<usize>,
}

impl FakeOs {
    /// A single monitor at `device_path`, registered under `nt_display`
    pub fn with_monitor(nt_display: &str, device_path: &str, name: TargetDeviceName) -> Self {
        FakeOs {
            names: Some(vec![Some(name)]),
            interface_paths: [(nt_display.to_owned(), device_path.to_owned())].into_iter().collect(),
            ..Default::default()
        }
    }
}

impl OsDisplayConfig for FakeOs {
    fn target_device_names(&self) -> Result<Vec<Result<TargetDeviceName>>> {
        bump(&self.queries);
        let names = self.names.as_ref().ok_or(Error::Os {
            call: "QueryDisplayConfig",
            message: "The parameter is incorrect.".into(),
        })?;
        Ok(names
            .iter()
            .map(|name| {
                name.clone().ok_or(Error::Os {
                    call: "DisplayConfigGetDeviceInfo",
                    message: "The parameter is incorrect.".into(),
                })
            })
            .collect())
    }

    fn monitor_interface_path(&self, display_name: &str) -> Option<String> {
        bump(&self.queries);
        self.interface_paths.get(display_name).cloned()
    }
}

/// 3840x2160 at 60 Hz (CVT-RB) over external DisplayPort
pub(crate) fn target(display_id: u32) -> Target {
    Target {
        display_id,
        details: TargetDetails {
            refresh_rate_1k: 59_997,
            scaling: Scaling::GPU_SCANOUT_TO_NATIVE,
            rotation: Rotation::R0,
            connector: ConnectorType::DISPLAYPORT_EXTERNAL,
            timing: Timing {
                horizontal: TimingAxis {
                    visible: 3840,
                    border: 0,
                    front_porch: 48,
                    sync_width: 32,
                    total: 4000,
                    sync_negative: false,
                },
                vertical: TimingAxis {
                    visible: 2160,
                    border: 0,
                    front_porch: 3,
                    sync_width: 5,
                    total: 2222,
                    sync_negative: true,
                },
                interlaced: false,
                pclk: 53300,
                name: "CVT-RB".into(),
            },
        },
    }
}

pub(crate) fn cloned_path(source_id: u32, display_ids: &[u32]) -> DisplayPath {
    DisplayPath {
        source_id,
        source: SourceMode {
            width: 3840,
            height: 2160,
            color_depth: 32,
            format: SourceFormat::A8R8G8B8,
        },
        targets: display_ids.iter().copied().map(target).collect(),
    }
}

pub(crate) fn single_target_path(source_id: u32, display_id: u32) -> DisplayPath {
    cloned_path(source_id, &[display_id])
}
