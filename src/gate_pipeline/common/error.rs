use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("No camera username/password configured")]
    MissingCredentials,

    #[error("Invalid gate configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch frame from camera: {0}")]
    FetchError(String),

    #[error("Failed to decode frame: {0}")]
    DecodeError(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write debug artifact: {0}")]
    DebugWriteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GateError {
    /// Acquisition failures end the request; they are never retried.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            GateError::FetchError(_) | GateError::DecodeError(_) | GateError::InputReadError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
