use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RawfetchError>;

#[derive(Debug, Error)]
pub enum RawfetchError {
    #[error("no provider available for url: {0:?}")]
    NoProvider(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Terminal fetch failure. Not retried and not meant to be recovered from.
    #[error("could not download {url} (status {status})")]
    FetchFailed { url: String, status: StatusCode },

    /// A request that cannot be put on the wire, e.g. a credential that is
    /// not a valid header value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage {op} failed: {message}")]
    Storage { op: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl RawfetchError {
    pub fn fetch_failed(url: &str, status: StatusCode) -> Self {
        Self::FetchFailed {
            url: url.to_string(),
            status,
        }
    }

    pub fn storage_error(op: &str, message: &str) -> Self {
        Self::Storage {
            op: op.to_string(),
            message: message.to_string(),
        }
    }

    /// Errors raised by the fetch core. The enclosing operation must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoProvider(_)
                | Self::InvalidUrl(_)
                | Self::InvalidRequest(_)
                | Self::FetchFailed { .. }
                | Self::Transport(_)
        )
    }
}

/* Conversions so `?` works smoothly */
impl From<reqwest::Error> for RawfetchError {
    fn from(e: reqwest::Error) -> Self {
        RawfetchError::Transport(Box::new(e))
    }
}
impl From<serde_json::Error> for RawfetchError {
    fn from(e: serde_json::Error) -> Self {
        RawfetchError::Config(e.to_string())
    }
}
