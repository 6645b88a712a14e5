use chrono::{DateTime, NaiveDateTime, Utc};
use sgp4::{Constants, Elements};

use crate::geodesy::Vector3;
use crate::propagation::error::PropagationError;
use crate::tle::{TleError, TleRecord};

/// Source of inertial satellite positions.
///
/// Implementations must be pure: the same instant always yields the same
/// answer and no state is kept between calls.
pub trait Propagator {
    /// Position in kilometres.
    fn position_km(&self, at: DateTime<Utc>) -> Result<Vector3, PropagationError>;
}

impl<P: Propagator + ?Sized> Propagator for &P {
    fn position_km(&self, at: DateTime<Utc>) -> Result<Vector3, PropagationError> {
        (**self).position_km(at)
    }
}

/// SGP4 (WGS-72 constants) over a parsed element set.
pub struct Sgp4Propagator {
    elements: Elements,
    constants: Constants,
}

impl Sgp4Propagator {
    pub fn from_record(record: &TleRecord) -> Result<Self, TleError> {
        let elements = record.elements()?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| TleError::malformed(record.name(), e))?;
        Ok(Self {
            elements,
            constants,
        })
    }

    /// Epoch of the element set.
    pub fn epoch(&self) -> NaiveDateTime {
        self.elements.datetime
    }
}

impl Propagator for Sgp4Propagator {
    fn position_km(&self, at: DateTime<Utc>) -> Result<Vector3, PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::Rejected {
                at,
                message: e.to_string(),
            })?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Rejected {
                at,
                message: e.to_string(),
            })?;

        if !prediction.position.iter().all(|c| c.is_finite()) {
            return Err(PropagationError::NonFinite { at });
        }
        Ok(prediction.position)
    }
}
