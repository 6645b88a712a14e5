use thiserror::Error;

#[derive(Debug, Error)]
pub enum TleError {
    #[error("malformed element set {name}: {message}")]
    MalformedElementSet { name: String, message: String },
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
}

impl TleError {
    pub(crate) fn malformed(name: &str, message: impl ToString) -> Self {
        TleError::MalformedElementSet {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}
