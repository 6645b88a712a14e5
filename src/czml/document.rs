//! Serde model for the subset of CZML this tool writes.

use serde::Serialize;

use crate::czml::colors::Rgba;
use crate::path::PathSegment;
use crate::window::iso8601;

/// A CZML document: a JSON array of packets, the document packet first.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    packets: Vec<Packet>,
}

impl Document {
    pub fn new(document_packet: Packet) -> Self {
        Self {
            packets: vec![document_packet],
        }
    }

    pub fn push(&mut self, packet: Packet) {
        self.packets.push(packet);
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Packet {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<Clock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billboard: Option<Billboard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockRange {
    Unbounded,
    Clamped,
    LoopStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClockStep {
    TickDependent,
    SystemClockMultiplier,
    SystemClock,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clock {
    pub interval: String,
    pub current_time: String,
    pub multiplier: u32,
    pub range: ClockRange,
    pub step: ClockStep,
}

#[derive(Debug, Clone, Serialize)]
pub struct Billboard {
    pub image: String,
    pub scale: f64,
    pub show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorValue {
    pub rgba: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelOffset {
    pub cartesian2: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalOrigin {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalOrigin {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelStyle {
    Fill,
    Outline,
    FillAndOutline,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub fill_color: ColorValue,
    pub font: String,
    pub horizontal_origin: HorizontalOrigin,
    pub outline_color: ColorValue,
    pub outline_width: f64,
    pub pixel_offset: PixelOffset,
    pub style: LabelStyle,
    pub text: String,
    pub show: bool,
    pub vertical_origin: VerticalOrigin,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntervalBoolean {
    pub interval: String,
    pub boolean: bool,
}

/// Time-varying number over one interval: `[t0, v0, t1, v1]` seconds from
/// `epoch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalNumber {
    pub interval: String,
    pub epoch: String,
    pub number: [f64; 4],
}

impl IntervalNumber {
    pub fn lead(segment: &PathSegment) -> Self {
        Self {
            interval: segment.interval(),
            epoch: iso8601(segment.epoch),
            number: segment.lead_curve().to_number_array(),
        }
    }

    pub fn trail(segment: &PathSegment) -> Self {
        Self {
            interval: segment.interval(),
            epoch: iso8601(segment.epoch),
            number: segment.trail_curve().to_number_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidColor {
    pub color: ColorValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub solid_color: SolidColor,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub show: Vec<IntervalBoolean>,
    pub width: f64,
    pub material: Material,
    pub resolution: u32,
    pub lead_time: Vec<IntervalNumber>,
    pub trail_time: Vec<IntervalNumber>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationAlgorithm {
    Linear,
    Lagrange,
    Hermite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceFrame {
    Fixed,
    Inertial,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub interpolation_algorithm: InterpolationAlgorithm,
    pub interpolation_degree: u32,
    pub reference_frame: ReferenceFrame,
    pub epoch: String,
    /// Flattened `[t, x, y, z, ...]`, seconds from `epoch` and metres.
    pub cartesian: Vec<f64>,
}
