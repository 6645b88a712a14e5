use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::geodesy::{modified_julian_date, to_geodetic, GeodeticPosition};
use crate::propagation::propagator::{Propagator, Sgp4Propagator};
use crate::propagation::sampler::KM_TO_M;
use crate::tle::TleRecord;

/// Sub-satellite point and altitude of `record` at `at`.
pub fn locate(record: &TleRecord, at: DateTime<Utc>) -> Result<GeodeticPosition, Error> {
    let propagator = Sgp4Propagator::from_record(record)?;
    locate_with(&propagator, at)
}

pub fn locate_with<P: Propagator>(
    propagator: &P,
    at: DateTime<Utc>,
) -> Result<GeodeticPosition, Error> {
    let [x, y, z] = propagator.position_km(at)?;
    let position = [x * KM_TO_M, y * KM_TO_M, z * KM_TO_M];
    Ok(to_geodetic(position, modified_julian_date(at))?)
}
