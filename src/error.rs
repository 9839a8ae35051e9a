use thiserror::Error;

/// Crate-level error enum covering every failure surface of the client.
///
/// Nothing is retried automatically: each variant is terminal for the
/// attempt that produced it and requires a new user-initiated action.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or a non-2xx response from the backend.
    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The backend answered 2xx but carried an error payload instead of
    /// the expected success field.
    #[error("backend error: {0}")]
    Application(String),

    /// The streamed response body could not be decoded.
    #[error("stream decode error: {0}")]
    Decode(String),

    /// Caught before any network call; no state was changed.
    #[error("{0}")]
    Validation(String),

    /// A second operation of the same class was started while one was
    /// still outstanding.
    #[error("a {0} operation is already in progress")]
    Busy(&'static str),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl Error {
    /// True for failures caught before any network traffic.
    pub fn is_pre_network(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Busy(_))
    }
}
