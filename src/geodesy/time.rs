use chrono::{DateTime, Utc};

/// Modified Julian date of the J2000.0 epoch.
pub const MJD_J2000: f64 = 51544.5;

const MJD_UNIX_EPOCH: f64 = 40587.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn modified_julian_date(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / MILLIS_PER_DAY + MJD_UNIX_EPOCH
}

pub fn days_since_j2000(mjd: f64) -> f64 {
    mjd - MJD_J2000
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_epoch() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(modified_julian_date(t), MJD_J2000);
        assert_eq!(days_since_j2000(modified_julian_date(t)), 0.0);
    }

    #[test]
    fn unix_epoch_and_fractional_days() {
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(modified_julian_date(t), 40587.0);
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
        assert!((modified_julian_date(t) - 60310.25).abs() < 1e-9);
    }
}
