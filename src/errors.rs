use std::error::Error as StdError;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::HttpResponse;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The requested resource doesn't exist (HTTP 404).
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[error("not found: {detail}")]
pub struct NotFound {
    pub detail: String,
}

impl NotFound {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Any other unexpected status from the deSEC API.
///
/// The body is kept as-is, since it isn't necessarily JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("deSEC API error: {status} - {}", String::from_utf8_lossy(.body))]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiError {
    /// The raw body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure of the underlying HTTP transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),
    #[error("failed to call API: {0}")]
    Connection(#[source] BoxError),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            TransportError::Timeout(Box::new(value))
        } else {
            TransportError::Connection(Box::new(value))
        }
    }
}

/// A `Link` header that can't be turned into cursors.
#[derive(Error, Debug)]
pub enum PaginationError {
    #[error("invalid Link header: {0}")]
    Header(#[from] reqwest::header::ToStrError),
    #[error("malformed link: {0}")]
    Malformed(String),
    #[error("invalid link target: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to create endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to marshal request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to create request: {0}")]
    Request(#[from] reqwest::header::InvalidHeaderValue),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to unmarshal response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to parse pagination cursors: {0}")]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// Classifies a response with an unexpected status.
    pub(crate) fn from_response(resp: HttpResponse) -> Self {
        if resp.status == StatusCode::NOT_FOUND {
            let not_found = serde_json::from_slice::<NotFound>(&resp.body)
                .unwrap_or_else(|_| NotFound::new(String::from_utf8_lossy(&resp.body)));
            return ClientError::NotFound(not_found);
        }

        ClientError::Api(ApiError {
            status: resp.status,
            body: resp.body,
        })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Whether the call was aborted by its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(TransportError::Timeout(_)))
    }

    /// The HTTP status of the response that caused the error, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientBuilderError {
    #[error("missing field: {0}")]
    MissingField(String),
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
