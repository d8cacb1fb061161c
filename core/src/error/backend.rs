use thiserror::Error;

/// Errors surfaced by completion backends.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("backend returned no content")]
    EmptyResponse,

    #[error("backend misconfigured: {0}")]
    Config(String),
}

impl BackendError {
    /// Rate limiting and server-side failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) | Self::EmptyResponse => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::Config(_) => false,
        }
    }
}
