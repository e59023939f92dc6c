use thiserror::Error;

pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error a [`Transport`](crate::client::Transport) reports when no response arrived.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid repository URL {url:?}: {reason}")]
    InvalidRepositoryUrl { url: String, reason: String },

    #[error("unsupported platform: {host}")]
    UnsupportedPlatform { host: String },

    #[error("request to {url} failed: {cause}")]
    RequestFailed {
        url: String,
        #[source]
        cause: RequestFailure,
    },

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built (bad token header, TLS backend).
    #[error("client setup failed: {0}")]
    ClientSetup(String),
}

/// Why the last attempt of a request failed.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[source] TransportError),
}

impl ScrapeError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        ScrapeError::InvalidRepositoryUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status of the failing response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScrapeError::RequestFailed {
                cause: RequestFailure::Status(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }
}
