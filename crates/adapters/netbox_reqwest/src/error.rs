//! NetBox-specific error type wrapping reqwest errors.

use monika_domain::error::MonikaError;

/// Errors originating from querying NetBox.
#[derive(Debug, thiserror::Error)]
pub enum NetboxError {
    /// Connection refused, DNS failure, body decoding, ...
    #[error("netbox transport error")]
    Transport(#[source] reqwest::Error),

    /// The request did not complete within the client timeout.
    #[error("netbox request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The configured address or a `next` link is not a usable URL.
    #[error("invalid netbox url")]
    InvalidUrl(#[from] url::ParseError),

    /// The NetBox address cannot carry a path (e.g. `mailto:`).
    #[error("netbox url {0} cannot be used as a base")]
    NotABase(String),

    /// NetBox answered with a non-success status.
    #[error("netbox answered {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },
}

impl From<reqwest::Error> for NetboxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl NetboxError {
    /// Convert into the domain error carried across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> MonikaError {
        MonikaError::Inventory(Box::new(self))
    }
}

impl From<NetboxError> for MonikaError {
    fn from(err: NetboxError) -> Self {
        err.into_domain()
    }
}
