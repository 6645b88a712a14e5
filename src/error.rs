use thiserror::Error;

use crate::config::ConfigError;
use crate::geodesy::GeodesyError;
use crate::propagation::{PropagationError, SampleFailure};
use crate::tle::TleError;
use crate::window::WindowError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Tle(#[from] TleError),
    #[error(transparent)]
    Propagation(#[from] PropagationError),
    #[error(transparent)]
    Sample(#[from] SampleFailure),
    #[error(transparent)]
    Geodesy(#[from] GeodesyError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{satellite}: {source}")]
    Satellite {
        satellite: String,
        #[source]
        source: Box<Error>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
