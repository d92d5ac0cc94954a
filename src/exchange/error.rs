//! Exchange error taxonomy

use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Credential environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("Request to completion service failed: {0}")]
    Transport(String),

    #[error("Completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion service returned no choices")]
    EmptyChoices,

    #[error("Malformed completion payload: {0}")]
    MalformedPayload(String),

    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ExchangeError>,
    },

    #[error("Gave up after {elapsed:?} and {attempts} attempts")]
    DeadlineExceeded {
        elapsed: Duration,
        attempts: u32,
        #[source]
        last: Box<ExchangeError>,
    },
}

impl ExchangeError {
    /// Whether resubmitting the identical request could succeed.
    ///
    /// Transport failures, timeouts, conflicts, rate limits and server
    /// errors are transient; bad credentials, oversized prompts and
    /// unexpected payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ExchangeError::Transport(_) => true,
            ExchangeError::Status { status, .. } => {
                matches!(status, 408 | 409 | 429) || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display omits the underlying cause (DNS, TLS, refused...)
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ExchangeError::Transport(message)
    }
}
