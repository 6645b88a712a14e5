mod error;
mod locate;
mod propagator;
mod sampler;

pub use error::{PropagationError, SampleFailure};
pub use locate::{locate, locate_with};
pub use propagator::{Propagator, Sgp4Propagator};
pub use sampler::{sample, sample_count, PositionSample, PositionSampler, KM_TO_M};
