use std::f64::consts::{PI, TAU};

use serde::Serialize;

use super::error::GeodesyError;
use super::precession::rotate_equinox;
use super::rotation::{norm, Vector3};
use super::time::{days_since_j2000, MJD_J2000};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

// Convergence threshold in units of machine epsilon times the equatorial radius.
const CONVERGENCE_FACTOR: f64 = 1.0e3;

// Linear Greenwich sidereal angle, degrees and degrees/day since J2000.0.
const GREENWICH_ANGLE_J2000_DEG: f64 = 280.4606;
const GREENWICH_RATE_DEG_PER_DAY: f64 = 360.985_647_3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub equatorial_radius_m: f64,
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Self = Self {
        equatorial_radius_m: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Geodetic coordinates. Angles are radians internally; use the `_deg`
/// accessors at output boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeodeticPosition {
    pub latitude_rad: f64,
    /// Always within (-pi, pi].
    pub longitude_rad: f64,
    pub altitude_m: f64,
}

impl GeodeticPosition {
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_rad.to_degrees()
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_rad.to_degrees()
    }
}

/// Converts inertial positions to latitude/longitude/altitude over an
/// ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticSolver {
    ellipsoid: Ellipsoid,
    max_iterations: usize,
}

impl Default for GeodeticSolver {
    fn default() -> Self {
        Self::new(Ellipsoid::WGS84)
    }
}

impl GeodeticSolver {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        Self {
            ellipsoid,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// `position` is in the J2000 inertial frame (metres). It is precessed to
    /// the mean equinox of `mjd` before solving.
    pub fn to_geodetic(
        &self,
        position: Vector3,
        mjd: f64,
    ) -> Result<GeodeticPosition, GeodesyError> {
        let mean_of_date = rotate_equinox(position, MJD_J2000, mjd);
        self.solve_mean_of_date(mean_of_date, days_since_j2000(mjd))
    }

    /// Solve for a position already expressed in the mean-of-date frame.
    ///
    /// The zero vector maps to latitude 0, longitude 0 and an altitude of
    /// minus the equatorial radius.
    pub fn solve_mean_of_date(
        &self,
        r: Vector3,
        days_since_j2000: f64,
    ) -> Result<GeodeticPosition, GeodesyError> {
        if norm(&r) == 0.0 {
            return Ok(GeodeticPosition {
                latitude_rad: 0.0,
                longitude_rad: 0.0,
                altitude_m: -self.ellipsoid.equatorial_radius_m,
            });
        }

        let (latitude_rad, altitude_m) = self.solve_latitude(r)?;
        let longitude_rad = wrap_longitude(r[1].atan2(r[0]) - greenwich_angle(days_since_j2000));

        Ok(GeodeticPosition {
            latitude_rad,
            longitude_rad,
            altitude_m,
        })
    }

    fn solve_latitude(&self, r: Vector3) -> Result<(f64, f64), GeodesyError> {
        let [x, y, z] = r;
        let r_equ = self.ellipsoid.equatorial_radius_m;
        let e2 = self.ellipsoid.eccentricity_squared();
        let tolerance = CONVERGENCE_FACTOR * f64::EPSILON * r_equ;
        let rho2 = x * x + y * y;

        let mut dz = e2 * z;
        for iteration in 1..=self.max_iterations {
            let zdz = z + dz;
            let nh = (rho2 + zdz * zdz).sqrt();
            let sin_phi = zdz / nh;
            let n = r_equ / (1.0 - e2 * sin_phi * sin_phi).sqrt();
            let dz_new = n * e2 * sin_phi;

            if (dz - dz_new).abs() < tolerance {
                log::trace!("geodetic latitude converged after {iteration} iterations");
                return Ok((zdz.atan2(rho2.sqrt()), nh - n));
            }
            dz = dz_new;
        }

        Err(GeodesyError::NumericNonConvergence {
            iterations: self.max_iterations,
        })
    }
}

/// WGS-84 conversion of a J2000 inertial position at the given MJD.
pub fn to_geodetic(position: Vector3, mjd: f64) -> Result<GeodeticPosition, GeodesyError> {
    GeodeticSolver::default().to_geodetic(position, mjd)
}

/// Greenwich sidereal angle in radians, linear in days since J2000.0.
pub fn greenwich_angle(days_since_j2000: f64) -> f64 {
    (GREENWICH_ANGLE_J2000_DEG + GREENWICH_RATE_DEG_PER_DAY * days_since_j2000).to_radians()
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = lon - TAU * (lon / TAU).floor();
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 6_378_137.0;

    fn ellipsoid_point(lat: f64, lon: f64, h: f64) -> Vector3 {
        let e2 = Ellipsoid::WGS84.eccentricity_squared();
        let n = R / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        [
            (n + h) * lat.cos() * lon.cos(),
            (n + h) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + h) * lat.sin(),
        ]
    }

    fn in_range(lon: f64) -> bool {
        lon > -PI && lon <= PI
    }

    #[test]
    fn equator_at_sea_level() {
        let pos = to_geodetic([R, 0.0, 0.0], MJD_J2000).unwrap();
        assert!(pos.latitude_rad.abs() < 1e-6);
        assert!(pos.altitude_m.abs() < 1e-3);
        // Only the Greenwich angle at J2000.0 remains in the longitude.
        assert!((pos.longitude_deg() - (360.0 - 280.4606)).abs() < 1e-9);
    }

    #[test]
    fn zero_vector_is_centre_of_earth() {
        for mjd in [MJD_J2000, 60_000.0, 12_345.678] {
            let pos = to_geodetic([0.0, 0.0, 0.0], mjd).unwrap();
            assert_eq!(pos.latitude_rad, 0.0);
            assert_eq!(pos.longitude_rad, 0.0);
            assert_eq!(pos.altitude_m, -R);
        }
    }

    #[test]
    fn recovers_latitude_and_altitude_of_ellipsoid_points() {
        let solver = GeodeticSolver::default();
        for (lat_deg, h) in [(45.0, 400_000.0), (-33.9, 0.0), (89.9, 12_000.0), (-70.0, 35_786_000.0)] {
            let lat = f64::to_radians(lat_deg);
            let lon = 0.5;
            let pos = solver
                .solve_mean_of_date(ellipsoid_point(lat, lon, h), 0.0)
                .unwrap();
            assert!((pos.latitude_rad - lat).abs() < 1e-9, "lat {lat_deg}");
            assert!((pos.altitude_m - h).abs() < 1e-3, "alt at {lat_deg}: {}", pos.altitude_m);
            let expected_lon = wrap_longitude(lon - greenwich_angle(0.0));
            assert!((pos.longitude_rad - expected_lon).abs() < 1e-12);
        }
    }

    #[test]
    fn north_pole() {
        let b = R * (1.0 - Ellipsoid::WGS84.flattening);
        let pos = GeodeticSolver::default()
            .solve_mean_of_date([0.0, 0.0, b], 0.0)
            .unwrap();
        assert!((pos.latitude_deg() - 90.0).abs() < 1e-9);
        assert!(pos.altitude_m.abs() < 1e-3);
    }

    #[test]
    fn to_geodetic_precesses_before_solving() {
        let v = [4_000_000.0, 3_000_000.0, 4_500_000.0];
        let mjd = 60_123.25;
        let direct = to_geodetic(v, mjd).unwrap();
        let manual = GeodeticSolver::default()
            .solve_mean_of_date(rotate_equinox(v, MJD_J2000, mjd), mjd - MJD_J2000)
            .unwrap();
        assert_eq!(direct, manual);
    }

    #[test]
    fn longitude_always_wrapped() {
        let solver = GeodeticSolver::default();
        for days in [-1.0e7, -3650.25, 0.0, 0.5, 9_000.123, 4.2e8] {
            for lon in [-3.0, -PI, 0.0, 1.0, PI, 3.1] {
                let r = ellipsoid_point(0.2, lon, 500_000.0);
                let pos = solver.solve_mean_of_date(r, days).unwrap();
                assert!(in_range(pos.longitude_rad), "{} at {days}", pos.longitude_rad);
            }
        }
        for raw in [-100.0, -TAU, -PI, PI, TAU, 7.5, 1.0e6] {
            assert!(in_range(wrap_longitude(raw)), "{raw}");
        }
        assert_eq!(wrap_longitude(PI), PI);
        assert!((wrap_longitude(-PI) - PI).abs() < 1e-15);
    }

    #[test]
    fn iteration_cap_surfaces_non_convergence() {
        let solver = GeodeticSolver::default().with_max_iterations(1);
        let err = solver
            .solve_mean_of_date(ellipsoid_point(0.8, 0.0, 400_000.0), 0.0)
            .unwrap_err();
        assert_eq!(err, GeodesyError::NumericNonConvergence { iterations: 1 });

        let err = to_geodetic([f64::NAN, 1.0, 1.0], MJD_J2000).unwrap_err();
        assert_eq!(
            err,
            GeodesyError::NumericNonConvergence {
                iterations: DEFAULT_MAX_ITERATIONS
            }
        );
    }

    #[test]
    fn degrees_at_the_boundary() {
        let pos = GeodeticPosition {
            latitude_rad: PI / 4.0,
            longitude_rad: -PI / 2.0,
            altitude_m: 10.0,
        };
        assert!((pos.latitude_deg() - 45.0).abs() < 1e-12);
        assert!((pos.longitude_deg() + 90.0).abs() < 1e-12);
    }
}
