use thiserror::Error;

/// Failures talking to the Slack Web API
#[derive(Debug, Error)]
pub enum SlackError {
    /// Slack answered `ok: false`
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    /// Non-2xx HTTP status
    #[error("{method} returned HTTP {status}")]
    Status { method: String, status: u16 },

    /// `ok: true` but the body was missing the fields we need
    #[error("{method} returned an unexpected response body")]
    MalformedResponse { method: String },

    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    #[error("{path} is not a regular file and cannot be uploaded")]
    NotAFile { path: String },

    #[error("Invalid Slack API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
}
