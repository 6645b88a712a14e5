use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeodesyError {
    #[error("geodetic latitude did not converge after {iterations} iterations")]
    NumericNonConvergence { iterations: usize },
}
