use sgp4::Elements;

use crate::tle::error::TleError;

pub const MINUTES_PER_DAY: f64 = 1440.0;

// Mean motion (rev/day) in line 2.
const MEAN_MOTION_COLUMNS: std::ops::Range<usize> = 52..63;
// Satellite catalog number in line 1.
const CATALOG_COLUMNS: std::ops::Range<usize> = 2..7;

/// Time for one revolution. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct OrbitalPeriod(f64);

impl OrbitalPeriod {
    pub fn from_minutes(minutes: f64) -> Option<Self> {
        (minutes.is_finite() && minutes > 0.0).then_some(Self(minutes))
    }

    pub fn from_mean_motion(revs_per_day: f64) -> Option<Self> {
        if !(revs_per_day.is_finite() && revs_per_day > 0.0) {
            return None;
        }
        Self::from_minutes(MINUTES_PER_DAY / revs_per_day)
    }

    pub fn minutes(&self) -> f64 {
        self.0
    }

    pub fn seconds(&self) -> f64 {
        self.0 * 60.0
    }
}

/// A named two-line element set. Immutable once built; the mean motion is
/// validated up front so the period is always available.
#[derive(Debug, Clone, PartialEq)]
pub struct TleRecord {
    name: String,
    line1: String,
    line2: String,
    period: OrbitalPeriod,
}

impl TleRecord {
    pub fn new(
        name: impl Into<String>,
        line1: impl Into<String>,
        line2: impl Into<String>,
    ) -> Result<Self, TleError> {
        let name = name.into().trim_end().to_string();
        let line1 = line1.into().trim().to_string();
        let line2 = line2.into().trim().to_string();

        if !line1.starts_with('1') {
            return Err(TleError::malformed(&name, "line 1 must start with '1'"));
        }
        if !line2.starts_with('2') {
            return Err(TleError::malformed(&name, "line 2 must start with '2'"));
        }

        let field = line2.get(MEAN_MOTION_COLUMNS).ok_or_else(|| {
            TleError::malformed(
                &name,
                format!("line 2 too short for mean motion ({} chars)", line2.len()),
            )
        })?;
        let mean_motion: f64 = field
            .trim()
            .parse()
            .map_err(|e| TleError::malformed(&name, format!("mean motion {field:?}: {e}")))?;
        let period = OrbitalPeriod::from_mean_motion(mean_motion).ok_or_else(|| {
            TleError::malformed(&name, format!("mean motion must be positive, got {mean_motion}"))
        })?;

        Ok(Self {
            name,
            line1,
            line2,
            period,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    pub fn catalog_number(&self) -> Option<&str> {
        self.line1.get(CATALOG_COLUMNS).map(str::trim)
    }

    /// Revolutions per day.
    pub fn mean_motion(&self) -> f64 {
        MINUTES_PER_DAY / self.period.minutes()
    }

    pub fn orbital_period(&self) -> OrbitalPeriod {
        self.period
    }

    pub fn orbital_period_minutes(&self) -> f64 {
        self.period.minutes()
    }

    /// Full SGP4 element parse of the two lines.
    pub fn elements(&self) -> Result<Elements, TleError> {
        Elements::from_tle(
            Some(self.name.clone()),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| TleError::malformed(&self.name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
    const ISS_LINE2: &str =
        "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";

    #[test]
    fn derives_period_from_mean_motion() {
        let record = TleRecord::new("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(record.name(), "ISS (ZARYA)");
        assert!((record.mean_motion() - 15.49697304).abs() < 1e-9);
        assert!((record.orbital_period_minutes() - 1440.0 / 15.49697304).abs() < 1e-9);
        assert_eq!(record.catalog_number(), Some("25544"));
    }

    #[test]
    fn period_for_fifteen_and_a_half_revs_per_day() {
        let line2 = "2 25544  51.6400 208.9163 0006317  69.9862  25.2906 15.54818572 00008";
        let record = TleRecord::new("ISS", ISS_LINE1, line2).unwrap();
        let minutes = record.orbital_period_minutes();
        assert!((minutes - 1440.0 / 15.54818572).abs() < 1e-12);
        assert!((minutes - 92.615).abs() < 1e-3);
    }

    #[test]
    fn period_is_positive_and_finite_for_any_valid_mean_motion() {
        for m in [0.0027, 1.0, 1.00266671, 15.5, 16.9] {
            let period = OrbitalPeriod::from_mean_motion(m).unwrap();
            assert!(period.minutes().is_finite());
            assert!(period.minutes() > 0.0);
            assert_eq!(period.minutes(), 1440.0 / m);
        }
    }

    #[test]
    fn rejects_non_positive_mean_motion() {
        let line2 = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523  0.00000000532279";
        let err = TleRecord::new("ZERO", ISS_LINE1, line2).unwrap_err();
        assert!(matches!(err, TleError::MalformedElementSet { .. }));

        let line2 = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 -1.00000000532279";
        assert!(TleRecord::new("NEG", ISS_LINE1, line2).is_err());
    }

    #[test]
    fn rejects_short_or_garbled_lines() {
        assert!(TleRecord::new("SHORT", ISS_LINE1, "2 25544  51.6327").is_err());
        let garbled = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.4969x304532279";
        assert!(TleRecord::new("BAD", ISS_LINE1, garbled).is_err());
        assert!(TleRecord::new("SWAPPED", ISS_LINE2, ISS_LINE1).is_err());
    }

    #[test]
    fn parses_sgp4_elements() {
        let record = TleRecord::new("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        let elements = record.elements().unwrap();
        assert_eq!(elements.norad_id, 25544);
        assert!((elements.mean_motion - record.mean_motion()).abs() < 1e-8);
    }
}
