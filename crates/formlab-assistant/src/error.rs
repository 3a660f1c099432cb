//! Assistant error types.

/// Reasons a completion did not produce usable text.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// No API key was found in the configured environment variable.
    #[error("no API key set (export {var})")]
    MissingApiKey { var: String },

    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    /// The response parsed but carried no text.
    #[error("response contained no text")]
    EmptyResponse,

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

impl From<ureq::Error> for AssistantError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Status(code),
            other => Self::Transport(other.to_string()),
        }
    }
}
