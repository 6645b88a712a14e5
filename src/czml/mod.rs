//! CZML output: the serde document model, colour cycling and the scene
//! assembler that ties sampling and path segmentation together.

mod assembler;
mod colors;
mod document;

pub use assembler::{Assembly, SampleGap, SatelliteFailure, SceneAssembler};
pub use colors::{nth_color, ColorCursor, Palette, Rgba};
pub use document::{
    Billboard, Clock, ClockRange, ClockStep, ColorValue, Document, HorizontalOrigin,
    InterpolationAlgorithm, IntervalBoolean, IntervalNumber, Label, LabelStyle, Material, Packet,
    Path, PixelOffset, Position, ReferenceFrame, SolidColor, VerticalOrigin,
};
