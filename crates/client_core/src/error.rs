use shared::error::PayloadError;
use thiserror::Error;

/// Failure reported by a [`GuestSource`](crate::GuestSource) or
/// [`DecisionOracle`](crate::DecisionOracle).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request did not complete, or failed without a readable `detail`.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service rejected the request and explained why.
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },
    /// The service answered successfully with an unusable body.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        Self::Server {
            status,
            detail: detail.into(),
        }
    }

    /// Text for the operator: the server's detail verbatim, otherwise `fallback`.
    pub fn operator_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Self::Server { detail, .. } => detail,
            Self::Transport(_) | Self::Protocol(_) => fallback,
        }
    }
}

impl From<PayloadError> for ClientError {
    fn from(value: PayloadError) -> Self {
        Self::Protocol(value.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
