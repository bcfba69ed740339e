use thiserror::Error;

use crate::registry::ProviderId;

/// Represents errors that can occur while talking to a provider.
///
/// Every variant is recoverable: the chat session converts them into a
/// displayable string and stays usable for the next call.
#[derive(Error, Debug)]
pub enum Error {
    /// No API key is configured for the selected provider; nothing was sent
    #[error("no API key configured for {0}")]
    MissingCredential(ProviderId),

    /// The provider answered with a non-2xx status; body kept verbatim
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport failure: DNS, refused connection, timeout
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body that is not valid JSON
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Error serializing a request payload
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Couldn't assemble the request URL from the configured base
    #[error("couldn't parse request url: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// Credential cannot be carried in an HTTP header
    #[error("authentication error: {0}")]
    Authentication(String),
}

/// A Result type that uses our Error type
pub type Result<T> = std::result::Result<T, Error>;
