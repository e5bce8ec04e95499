use std::path::PathBuf;

/// Failure of a single SEMP monitor call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("SEMP request to {url} returned HTTP {status}")]
    Status { status: u16, url: String, body: String },

    #[error("SEMP request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed SEMP response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid SEMP url: {0}")]
    Url(String),
}

impl TransportError {
    /// HTTP status code, when the broker answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode { .. } | Self::Url(_) => None,
        }
    }

    /// Raw response body carried by an HTTP-level rejection.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
