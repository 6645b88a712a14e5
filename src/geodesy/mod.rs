//! Inertial to geodetic conversion: equinox precession, the iterative
//! latitude solver and a linear Earth-rotation correction.

mod error;
mod geodetic;
mod precession;
mod rotation;
mod time;

pub use error::GeodesyError;
pub use geodetic::{
    greenwich_angle, to_geodetic, wrap_longitude, Ellipsoid, GeodeticPosition, GeodeticSolver,
    DEFAULT_MAX_ITERATIONS,
};
pub use precession::{julian_centuries, precession_matrix, rotate_equinox};
pub use rotation::{norm, RotationMatrix, Vector3};
pub use time::{days_since_j2000, modified_julian_date, MJD_J2000};
