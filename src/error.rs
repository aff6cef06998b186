use thiserror::Error;

/// Errors surfaced by [`crate::PfpClient`]. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum PfpError {
    /// The local gate is closed; no request was sent.
    #[error("Rate limit reached! Resets at {reset_at_ms} ms since epoch")]
    RateLimited { reset_at_ms: i64 },

    #[error("{status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("failed to decode response body: {0}")]
    BodyDecode(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, PfpError>;
