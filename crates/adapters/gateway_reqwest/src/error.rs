//! Gateway-specific error type wrapping reqwest errors.

use monika_domain::error::MonikaError;

/// Errors originating from talking to the gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connection refused, DNS failure, body decoding, ...
    #[error("gateway transport error")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the client timeout.
    #[error("gateway request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The configured gateway address is not a usable URL.
    #[error("invalid gateway url")]
    InvalidUrl(#[from] url::ParseError),

    /// The gateway address cannot carry a path (e.g. `mailto:`).
    #[error("gateway url {0} cannot be used as a base")]
    NotABase(String),

    /// The gateway answered, but not with the status the endpoint promises.
    #[error("{endpoint} answered {status}, expected {expected}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        expected: u16,
    },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl GatewayError {
    /// Convert into the domain error carried across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> MonikaError {
        MonikaError::Gateway(Box::new(self))
    }
}

impl From<GatewayError> for MonikaError {
    fn from(err: GatewayError) -> Self {
        err.into_domain()
    }
}
