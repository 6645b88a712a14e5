//! Orbit-period-aligned segmentation of the simulation window, used to drive
//! the fading lead/trail orbit track.

mod segment;

pub use segment::{segment, FadeCurve, PathSegment};
