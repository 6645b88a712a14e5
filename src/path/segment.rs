use chrono::{DateTime, Duration, Utc};

use crate::tle::OrbitalPeriod;
use crate::window::{interval_string, TimeWindow};

/// Two `(time, value)` points, times in seconds from the segment epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeCurve(pub [(f64, f64); 2]);

impl FadeCurve {
    /// Flattened `[t0, v0, t1, v1]`.
    pub fn to_number_array(&self) -> [f64; 4] {
        let [(t0, v0), (t1, v1)] = self.0;
        [t0, v0, t1, v1]
    }
}

/// One period-aligned slice of the simulation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub epoch: DateTime<Utc>,
    pub fade_start_seconds: f64,
    pub fade_end_seconds: f64,
}

impl PathSegment {
    fn spanning(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let duration_seconds = (end - start).num_microseconds().unwrap_or(i64::MAX) as f64 / 1e6;
        Self {
            start,
            end,
            epoch: start,
            fade_start_seconds: 0.0,
            fade_end_seconds: duration_seconds,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_seconds(&self) -> f64 {
        self.fade_end_seconds - self.fade_start_seconds
    }

    pub fn interval(&self) -> String {
        interval_string(self.start, self.end)
    }

    /// Lead time: the full span ahead at the segment start, nothing at its end.
    pub fn lead_curve(&self) -> FadeCurve {
        FadeCurve([
            (self.fade_start_seconds, self.fade_end_seconds),
            (self.fade_end_seconds, self.fade_start_seconds),
        ])
    }

    /// Trail time: nothing behind at the segment start, the full span at its end.
    pub fn trail_curve(&self) -> FadeCurve {
        FadeCurve([
            (self.fade_start_seconds, self.fade_start_seconds),
            (self.fade_end_seconds, self.fade_end_seconds),
        ])
    }
}

fn period_microseconds(period: OrbitalPeriod) -> i64 {
    // Saturating cast; a period is never shorter than one tick.
    ((period.seconds() * 1e6).round() as i64).max(1)
}

/// Tile `window` into one leading partial orbit followed by whole orbits.
///
/// The first segment covers `window mod period`; each following segment is a
/// full period chained from the previous end, and the last one ends exactly
/// at the window end. Tiling is done on integer microseconds. When the
/// period is at least the window length (or the window is too long to count
/// in microseconds) a single segment spans the whole window.
pub fn segment(window: &TimeWindow, period: OrbitalPeriod) -> Vec<PathSegment> {
    let orbit = period_microseconds(period);
    let total = match window.duration().num_microseconds() {
        Some(total) if orbit < total => total,
        _ => return vec![PathSegment::spanning(window.start(), window.end())],
    };

    let full_orbits = total / orbit;
    let leftover = total - full_orbits * orbit;

    // Every boundary lies within [start, end], so the additions cannot overflow.
    let boundary = |offset: i64| window.start() + Duration::microseconds(offset);

    let mut segments = Vec::with_capacity(full_orbits as usize + 1);
    let mut start = window.start();
    for k in 0..=full_orbits {
        let end = if k == full_orbits {
            window.end()
        } else {
            boundary(leftover + k * orbit)
        };
        let segment = PathSegment::spanning(start, end);
        log::debug!("Sub-path interval: {}", segment.interval());
        segments.push(segment);
        start = end;
    }

    segments
}
