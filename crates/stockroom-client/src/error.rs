//! Client error types.

use stockroom_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never got an answer.
    #[error("network error: {0}")]
    Network(String),

    /// The answer wasn't the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Rejected(#[from] CoreError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
