use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PropagationError {
    #[error("propagator rejected {at}: {message}")]
    Rejected { at: DateTime<Utc>, message: String },
    #[error("propagator returned a non-finite position at {at}")]
    NonFinite { at: DateTime<Utc> },
}

/// A propagation failure tied to the sample offset that produced it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("sample at +{offset_seconds}s: {source}")]
pub struct SampleFailure {
    pub offset_seconds: u64,
    #[source]
    pub source: PropagationError,
}
