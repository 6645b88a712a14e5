use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::Error;
use crate::geodesy::Vector3;
use crate::propagation::error::{PropagationError, SampleFailure};
use crate::propagation::propagator::{Propagator, Sgp4Propagator};
use crate::tle::TleRecord;
use crate::window::TimeWindow;

/// Propagators report kilometres; samples are emitted in metres.
pub const KM_TO_M: f64 = 1000.0;

/// Inertial position at `offset_seconds` after the sampler start, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSample {
    pub offset_seconds: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PositionSample {
    pub fn position(&self) -> Vector3 {
        [self.x, self.y, self.z]
    }
}

/// Number of samples needed to cover `window` at `step`, plus `margin` extra
/// samples past the end.
pub fn sample_count(window: &TimeWindow, step: NonZeroU32, margin: usize) -> usize {
    (window.seconds() / f64::from(step.get())).ceil() as usize + margin
}

/// Evaluates a propagator at a fixed cadence from `start`.
pub struct PositionSampler<P> {
    propagator: P,
    start: DateTime<Utc>,
    step: NonZeroU32,
}

impl<P: Propagator> PositionSampler<P> {
    pub fn new(propagator: P, start: DateTime<Utc>, step: NonZeroU32) -> Self {
        Self {
            propagator,
            start,
            step,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn offset(&self, index: usize) -> u64 {
        index as u64 * u64::from(self.step.get())
    }

    pub fn sample_at(&self, offset_seconds: u64) -> Result<PositionSample, SampleFailure> {
        let fail = |source| SampleFailure {
            offset_seconds,
            source,
        };

        let at = i64::try_from(offset_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| self.start.checked_add_signed(d))
            .ok_or_else(|| {
                fail(PropagationError::Rejected {
                    at: self.start,
                    message: format!("offset {offset_seconds}s is out of range"),
                })
            })?;

        let [x, y, z] = self.propagator.position_km(at).map_err(fail)?;
        Ok(PositionSample {
            offset_seconds,
            x: x * KM_TO_M,
            y: y * KM_TO_M,
            z: z * KM_TO_M,
        })
    }

    /// `count` samples at offsets `0, step, 2*step, ...`, stopping at the
    /// first failure.
    pub fn sample(&self, count: usize) -> Result<Vec<PositionSample>, SampleFailure> {
        (0..count).map(|i| self.sample_at(self.offset(i))).collect()
    }

    /// Like [`sample`](Self::sample) but every offset is attempted; failures
    /// are returned in place next to the successful samples.
    pub fn sample_each(&self, count: usize) -> Vec<Result<PositionSample, SampleFailure>> {
        (0..count).map(|i| self.sample_at(self.offset(i))).collect()
    }
}

impl<P: Propagator + Sync> PositionSampler<P> {
    /// Parallel [`sample_each`](Self::sample_each). Output is ordered by
    /// offset.
    pub fn sample_parallel(
        &self,
        count: usize,
    ) -> Vec<Result<PositionSample, SampleFailure>> {
        (0..count)
            .into_par_iter()
            .map(|i| self.sample_at(self.offset(i)))
            .collect()
    }
}

/// SGP4 samples for `record`, failing on the first propagation error.
pub fn sample(
    record: &TleRecord,
    start: DateTime<Utc>,
    count: usize,
    step: NonZeroU32,
) -> Result<Vec<PositionSample>, Error> {
    let propagator = Sgp4Propagator::from_record(record)?;
    let samples = PositionSampler::new(propagator, start, step).sample(count)?;
    Ok(samples)
}
