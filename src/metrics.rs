//! Numbers derived from the driver's raw timing and link fields.

use crate::model::{Bpc, ColorFormat, DisplayPortInfo, LinkRate, TargetDetails};

/// 8b/10b channel coding leaves 80% of the raw link rate for data
pub const CHANNEL_CODING_EFFICIENCY: f64 = 0.8;

/// Utilization above which the link can only be carrying compressed data
pub const DSC_UTILIZATION: f64 = 0.998;

/// Utilization above which the link is considered saturated
pub const NEAR_MAXIMUM_UTILIZATION: f64 = 0.99;

/// Bits per colour component, `0` for the driver default and `-1` for
/// unrecognised codes
pub fn bits_per_channel(bpc: Bpc) -> i32 {
    match bpc {
        Bpc::DEFAULT => 0,
        Bpc::BPC_6 => 6,
        Bpc::BPC_8 => 8,
        Bpc::BPC_10 => 10,
        Bpc::BPC_12 => 12,
        Bpc::BPC_16 => 16,
        _ => -1,
    }
}

/// Nominal per-lane rate in Gbps
pub fn link_rate_gbps(rate: LinkRate) -> Option<f64> {
    Some(match rate {
        LinkRate::DP_1_62GBPS => 1.62,
        LinkRate::DP_2_70GBPS => 2.7,
        LinkRate::DP_5_40GBPS => 5.4,
        LinkRate::DP_8_10GBPS => 8.1,
        LinkRate::EDP_2_16GBPS => 2.16,
        LinkRate::EDP_2_43GBPS => 2.43,
        LinkRate::EDP_3_24GBPS => 3.24,
        LinkRate::EDP_4_32GBPS => 4.32,
        _ => return None,
    })
}

/// Per-lane payload rate in Gbps after channel coding, `0.0` for unrecognised
/// rates
pub fn link_net_rate_gbps(rate: LinkRate) -> f64 {
    link_rate_gbps(rate).map_or(0.0, |gbps| gbps * CHANNEL_CODING_EFFICIENCY)
}

/// Video data rate in Gbps
///
/// `pclk` is the driver's pixel clock in 10 kHz units. 4:2:2 subsampling
/// carries two components per pixel instead of three.
pub fn data_rate_gbps(pclk: u32, bits_per_channel: i32, format: ColorFormat) -> f64 {
    let rate = pclk as f64 * 10_000.0 * bits_per_channel as f64 * 3.0 / 1e9;
    match format {
        ColorFormat::YCBCR422 => rate * 2.0 / 3.0,
        _ => rate,
    }
}

/// Fraction of the link's payload capacity used by `data_rate`
///
/// Not clamped; values above 1 mean the stream is compressed.
pub fn link_utilization(data_rate: f64, link_net_rate: f64, lane_count: u32) -> f64 {
    data_rate / (link_net_rate * lane_count as f64)
}

/// Interpretation of a high [`link_utilization`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkHint {
    /// The stream exceeds what the link can carry uncompressed
    CompressionLikely,
    /// The stream fills the link almost exactly
    NearMaximum,
}

impl LinkHint {
    /// The hint for a utilization ratio, if it is high enough to warrant one
    pub fn from_utilization(utilization: f64) -> Option<Self> {
        if utilization > DSC_UTILIZATION {
            Some(LinkHint::CompressionLikely)
        } else if utilization > NEAR_MAXIMUM_UTILIZATION {
            Some(LinkHint::NearMaximum)
        } else {
            None
        }
    }

    /// Report annotation
    pub fn message(&self) -> &'static str {
        match self {
            LinkHint::CompressionLikely => "Display Stream Compression (DSC) is probably active",
            LinkHint::NearMaximum => "(Impressive, very nice)",
        }
    }
}

/// Link metrics of one DisplayPort target
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DerivedMetrics {
    /// Bits per component, see [`bits_per_channel`]
    pub bits_per_channel: i32,
    /// Video data rate in Gbps
    pub data_rate: f64,
    /// Payload rate of one lane in Gbps
    pub link_net_rate: f64,
    /// Active lanes
    pub lane_count: u32,
}

impl DerivedMetrics {
    /// Metrics for a target's timing carried over its DisplayPort link
    pub fn new(details: &TargetDetails, dp: &DisplayPortInfo) -> Self {
        let bits_per_channel = bits_per_channel(dp.bpc);
        DerivedMetrics {
            bits_per_channel,
            data_rate: data_rate_gbps(details.timing.pclk, bits_per_channel, dp.color_format),
            link_net_rate: link_net_rate_gbps(dp.current_link_rate),
            lane_count: dp.current_lane_count,
        }
    }

    /// Payload capacity of all active lanes in Gbps
    pub fn available_rate(&self) -> f64 {
        self.link_net_rate * self.lane_count as f64
    }

    /// Fraction of the link payload capacity used by the stream
    pub fn utilization(&self) -> f64 {
        link_utilization(self.data_rate, self.link_net_rate, self.lane_count)
    }

    /// See [`LinkHint::from_utilization`]
    pub fn hint(&self) -> Option<LinkHint> {
        LinkHint::from_utilization(self.utilization())
    }
}
