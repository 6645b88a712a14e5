use chrono::{DateTime, Duration, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("invalid window: end {end} is not after start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("window of {length} from {start} is out of range")]
    OutOfRange { start: DateTime<Utc>, length: String },
}

/// A simulation interval with `end` strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Result<Self, WindowError> {
        let end = start
            .checked_add_signed(length)
            .ok_or_else(|| WindowError::OutOfRange {
                start,
                length: length.to_string(),
            })?;
        Self::new(start, end)
    }

    /// [`starting_at`](Self::starting_at) for a `std` duration, as parsed by
    /// `humantime`.
    pub fn starting_at_std(
        start: DateTime<Utc>,
        length: std::time::Duration,
    ) -> Result<Self, WindowError> {
        let length = Duration::from_std(length).map_err(|_| WindowError::OutOfRange {
            start,
            length: humantime::format_duration(length).to_string(),
        })?;
        Self::starting_at(start, length)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Window length in minutes, millisecond resolution.
    pub fn minutes(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 60_000.0
    }

    pub fn seconds(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 1000.0
    }

    /// ISO 8601 `start/end` interval.
    pub fn to_interval_string(&self) -> String {
        interval_string(self.start, self.end)
    }
}

pub fn iso8601(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn interval_string(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("{}/{}", iso8601(start), iso8601(end))
}
