//! The box-drawing text report.

use {
    crate::{
        correlate::{correlate_path, IdentityMapping},
        driver::DisplayDriver,
        labels::dp_link,
        metrics::{bits_per_channel, DerivedMetrics},
        model::{DisplayPath, DisplayPortInfo, HdrCapabilities, HdrCapabilityFlags, HdrColorData, HdrMode, Target, Timing},
        os::OsDisplayConfig,
    },
    log::{debug, trace},
    std::io::{self, Write},
};

const PATH_RULE: &str = "════════════════════════════════════════";
const FOOTER: &str = "╚═══════════════════════════════════════════════════════════";

/// Renders every display path the driver reports
///
/// Per-target queries run while rendering; any that fail only drop their
/// own section of the report.
pub struct Report<'a, D: ?Sized, O: ?Sized> {
    driver: &'a D,
    os: &'a O,
}

impl<'a, D, O> Report<'a, D, O>
where
    D: DisplayDriver + ?Sized,
    O: OsDisplayConfig + ?Sized,
{
    /// A report over the given driver and OS gateways
    pub fn new(driver: &'a D, os: &'a O) -> Self {
        Report { driver, os }
    }

    /// Write one framed section per path, in the order given
    pub fn write<W: Write + ?Sized>(&self, out: &mut W, paths: &[DisplayPath]) -> io::Result<()> {
        for path in paths {
            self.write_path(out, path)?;
        }
        Ok(())
    }

    fn write_path<W: Write + ?Sized>(&self, out: &mut W, path: &DisplayPath) -> io::Result<()> {
        let source = &path.source;
        writeln!(out, "╔══ Display path #{} {PATH_RULE}", path.source_id)?;
        writeln!(out, "║ Attached displays: {}", path.targets.len())?;
        writeln!(
            out,
            "║ Display source format: {} x {} x {} bpp",
            source.width, source.height, source.color_depth
        )?;
        writeln!(out, "║         source color: {}", source.format)?;
        writeln!(out, "║")?;

        let mapping = correlate_path(self.driver, self.os, path);
        for (i, target) in path.targets.iter().enumerate() {
            if i > 0 {
                writeln!(out, "║")?;
            }
            self.write_target(out, target, mapping.as_ref())?;
        }
        writeln!(out, "{FOOTER}")?;
        writeln!(out)
    }

    fn write_target<W: Write + ?Sized>(
        &self,
        out: &mut W,
        target: &Target,
        mapping: Option<&IdentityMapping>,
    ) -> io::Result<()> {
        let details = &target.details;
        writeln!(out, "╟─┐ DisplayID: 0x{:x}", target.display_id)?;
        if let Some(mapping) = mapping {
            if let Some(nt_display) = &mapping.nt_display {
                writeln!(out, "║ ├─ NT display: {nt_display}")?;
            }
            if let Some(name) = &mapping.friendly_name {
                writeln!(out, "║ ├─ Monitor name: {name}")?;
            }
        }
        writeln!(out, "║ ├─ Refresh rate: {:.2} Hz", details.refresh_rate())?;
        writeln!(out, "║ ├─ Scaling mode: {}", details.scaling)?;
        writeln!(out, "║ │  (scaling only happens if source and display resolution differ)")?;
        writeln!(out, "║ ├─ Rotation: {}", details.rotation)?;
        writeln!(out, "║ │")?;
        write_timing(out, &details.timing)?;
        writeln!(out, "║ │")?;
        writeln!(out, "║ ├─ Connection: {}", details.connector)?;

        match self.driver.display_port_info(target.display_id) {
            Ok(dp) if dp.is_dp() => write_display_port(out, &DerivedMetrics::new(details, &dp), &dp)?,
            Ok(_) => trace!("display 0x{:x} is not driven over DisplayPort", target.display_id),
            Err(e) => debug!("display 0x{:x}: {e}", target.display_id),
        }

        match self.driver.hdr_capabilities(target.display_id) {
            Ok(caps) if caps.any_supported() => write_hdr_capabilities(out, &caps)?,
            Ok(_) => writeln!(out, "║ ├─ No HDR capabilities")?,
            Err(e) => debug!("display 0x{:x}: {e}", target.display_id),
        }

        match self.driver.hdr_color_data(target.display_id) {
            Ok(color) => write_hdr_status(out, &color),
            Err(e) => {
                debug!("display 0x{:x}: {e}", target.display_id);
                Ok(())
            },
        }
    }
}

fn polarity(negative: bool) -> &'static str {
    match negative {
        true => "-",
        false => "+",
    }
}

fn write_timing<W: Write + ?Sized>(out: &mut W, timing: &Timing) -> io::Result<()> {
    let (h, v) = (&timing.horizontal, &timing.vertical);
    let scan = match timing.interlaced {
        true => "interlaced",
        false => "progressive",
    };
    writeln!(out, "║ ├─┐ Timing (Horz x Vert): {scan} scan")?;
    writeln!(out, "║ │ ├─ Name: {}", timing.name)?;
    writeln!(out, "║ │ ├─ Pixel clock: {:.3} MHz", timing.pixel_clock_mhz())?;
    writeln!(out, "║ │ ├─ Total:       {:4} x {:4}", h.total, v.total)?;
    writeln!(out, "║ │ ├─ Visible:     {:4} x {:4}", h.visible, v.visible)?;
    writeln!(out, "║ │ ├─ Blank:       {:4} x {:4}", h.border, v.border)?;
    writeln!(out, "║ │ ├─ Front porch: {:4} x {:4}", h.front_porch, v.front_porch)?;
    writeln!(out, "║ │ ├─ Sync width:  {:4} x {:4}", h.sync_width, v.sync_width)?;
    writeln!(
        out,
        "║ │ └─ Sync polarity:  {}      {}",
        polarity(h.sync_negative),
        polarity(v.sync_negative)
    )
}

/// BCD `0x14` is revision 1.4
fn dpcd_revision(version: u32) -> String {
    format!("{}.{}", version >> 4 & 0xf, version & 0xf)
}

fn write_display_port<W: Write + ?Sized>(out: &mut W, metrics: &DerivedMetrics, dp: &DisplayPortInfo) -> io::Result<()> {
    writeln!(out, "║ ├─┐ DisplayPort info:")?;
    if dp.dpcd_version != 0 {
        writeln!(out, "║ │ ├─ DPCD revision: {}", dpcd_revision(dp.dpcd_version))?;
    }
    writeln!(out, "║ │ ├─ Current link: {}", dp_link(dp.current_link_rate, dp.current_lane_count))?;
    writeln!(out, "║ │ ├─ Maximum link: {}", dp_link(dp.max_link_rate, dp.max_lane_count))?;
    writeln!(
        out,
        "║ │ ├─ Data rate: Calculated {:.2} Gbps / {:.2} Gbps available ({:.1}%)",
        metrics.data_rate,
        metrics.available_rate(),
        metrics.utilization() * 100.0
    )?;
    if let Some(hint) = metrics.hint() {
        writeln!(out, "║ │ │  {}", hint.message())?;
    }
    writeln!(
        out,
        "║ │ └─ Current color format: {} ({} bpc, color space {})",
        dp.color_format, metrics.bits_per_channel, dp.colorimetry
    )?;
    writeln!(out, "║ │")
}

fn write_hdr_capabilities<W: Write + ?Sized>(out: &mut W, caps: &HdrCapabilities) -> io::Result<()> {
    let flag = |flag| u8::from(caps.supports(flag));
    writeln!(out, "║ ├─┐ HDR capabilities:")?;
    writeln!(out, "║ │ ├─ HDMI 2.0a ST.2084 EOTF: {}", flag(HdrCapabilityFlags::ST2084_EOTF))?;
    writeln!(
        out,
        "║ │ ├─ HDMI 2.0a traditional HDR gamma: {}",
        flag(HdrCapabilityFlags::TRADITIONAL_HDR_GAMMA)
    )?;
    writeln!(out, "║ │ ├─ EDR on SDR: {}", flag(HdrCapabilityFlags::EDR))?;
    writeln!(out, "║ │ ├─ SDR gamma: {}", flag(HdrCapabilityFlags::TRADITIONAL_SDR_GAMMA))?;
    writeln!(out, "║ │ ├─ Dolby Vision: {}", flag(HdrCapabilityFlags::DOLBY_VISION))?;
    writeln!(out, "║ │ ├─ HDR10+: {}", flag(HdrCapabilityFlags::HDR10_PLUS))?;
    writeln!(out, "║ │ ├─ HDR10+ Gaming: {}", flag(HdrCapabilityFlags::HDR10_PLUS_GAMING))?;

    let dolby_vision = caps.supports(HdrCapabilityFlags::DOLBY_VISION);
    writeln!(
        out,
        "║ │ {}─ Luminance range: {:.2} - {} nits",
        if dolby_vision { "├" } else { "└" },
        caps.min_luminance as f64 / 10000.0,
        caps.max_luminance
    )?;
    if dolby_vision {
        let dv = &caps.dolby_vision;
        writeln!(out, "║ │ └─┐ DolbyVision:")?;
        writeln!(
            out,
            "║ │   ├─ Luminance range: {:.2} - {} nits",
            dv.target_min_luminance as f64 / 10000.0,
            dv.target_max_luminance
        )?;
        writeln!(out, "║ │   └─ DCI P3: {}", u8::from(dv.dci_p3))?;
    }
    Ok(())
}

fn write_hdr_status<W: Write + ?Sized>(out: &mut W, color: &HdrColorData) -> io::Result<()> {
    write!(out, "║ └─ HDR status: {}", color.mode)?;
    if color.mode != HdrMode::OFF {
        write!(out, " ({} bpc)", bits_per_channel(color.bpc))?;
    }
    writeln!(out)
}
