//! Error types for the credential client, cache and flows
//!
//! Messages never include passwords or the authorization header.

/// Failures talking to the credential store. `Clone` so one coalesced
/// revalidation can report the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub(crate) fn unexpected_status(status: u16) -> Self {
        ClientError::Protocol(format!("unexpected HTTP status {}", status))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Protocol(format!("malformed response: {}", err))
    }
}

/// Failures of the popup lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No active tab")]
    NoActiveTab,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Rejected new-record form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Username is required")]
    MissingUsername,
}

/// Failures creating a record from the web view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Problems building a client configuration from stored settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Store credentials are not configured")]
    MissingCredentials,
}
