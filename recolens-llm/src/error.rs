use thiserror::Error;

/// Failure of a single recommendation request.
///
/// `Display` keeps the `Error: ...` text users saw before errors were typed.
#[derive(Error, Debug)]
pub enum RecommendationError {
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error: malformed response: {0}")]
    MalformedResponse(String),

    #[error("Error: invalid client configuration: {0}")]
    Config(String),
}

impl RecommendationError {
    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            RecommendationError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendationError>;
