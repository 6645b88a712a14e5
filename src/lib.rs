//! Converts two-line element sets into a time-tagged CZML scene.
//!
//! The numeric core lives in [`path`] (orbit-aligned trail segmentation) and
//! [`geodesy`] (precession plus the iterative geodetic solver). [`propagation`]
//! wraps the SGP4 propagator and [`czml`] assembles the output document.

pub mod config;
pub mod czml;
pub mod error;
pub mod geodesy;
pub mod path;
pub mod propagation;
pub mod tle;
pub mod window;

pub use config::SceneConfig;
pub use error::Error;
pub use window::TimeWindow;
