use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported base url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected request: {0}")]
    Api(#[from] ApiError),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status returned by the backend, when the failure got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
