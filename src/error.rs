use thiserror::Error;

/// Errors produced by the chat core.
///
/// `Transport`, `Status` and `MalformedBody` are the three shapes of a failed
/// completion call. They are surfaced to the user identically and never retried.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    MalformedBody(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
