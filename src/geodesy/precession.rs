//! IAU 1976 precession between mean equinoxes.

use std::f64::consts::PI;

use super::rotation::{RotationMatrix, Vector3};
use super::time::MJD_J2000;

const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
const ARCSEC_PER_RADIAN: f64 = 3600.0 * 180.0 / PI;

/// Precession matrix from the mean equinox at `t1` to the one at `t2`, both in
/// Julian centuries since J2000.0.
pub fn precession_matrix(t1: f64, t2: f64) -> RotationMatrix {
    let dt = t2 - t1;

    let zeta = ((2306.2181 + (1.39656 - 0.000139 * t1) * t1)
        + ((0.30188 - 0.000344 * t1) + 0.017998 * dt) * dt)
        * dt
        / ARCSEC_PER_RADIAN;
    let z = zeta + ((0.79280 + 0.000411 * t1) + 0.000205 * dt) * dt * dt / ARCSEC_PER_RADIAN;
    let theta = ((2004.3109 - (0.85330 + 0.000217 * t1) * t1)
        - ((0.42665 + 0.000217 * t1) + 0.041833 * dt) * dt)
        * dt
        / ARCSEC_PER_RADIAN;

    RotationMatrix::about_z(-z) * RotationMatrix::about_y(theta) * RotationMatrix::about_z(-zeta)
}

/// Julian centuries since J2000.0 for a modified Julian date.
pub fn julian_centuries(mjd: f64) -> f64 {
    (mjd - MJD_J2000) / DAYS_PER_JULIAN_CENTURY
}

/// Re-express `position` from the mean equinox of `from_mjd` in the mean
/// equinox of `to_mjd`.
pub fn rotate_equinox(position: Vector3, from_mjd: f64, to_mjd: f64) -> Vector3 {
    precession_matrix(julian_centuries(from_mjd), julian_centuries(to_mjd)) * position
}
