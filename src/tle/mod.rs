mod error;
mod loader;
mod record;

pub use error::TleError;
pub use loader::{load_tle_file, parse_tle_text};
pub use record::{OrbitalPeriod, TleRecord, MINUTES_PER_DAY};
