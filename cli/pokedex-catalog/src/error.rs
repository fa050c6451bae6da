//! Error handling for catalog operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Common error type for catalog operations.
///
/// Consumers generally only tell [CatalogClientError::NotFound] apart,
/// everything else is a generic failure to reach or understand the catalog.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("'{0}' was not found in the catalog")]
    NotFound(String),
    #[error("catalog responded with unexpected status {0}")]
    UnexpectedStatus(StatusCode),
    #[error("request to the catalog timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("failed to reach the catalog")]
    Request(#[source] reqwest::Error),
    #[error("failed to decode catalog response")]
    InvalidResponse(#[source] reqwest::Error),
    #[error("invalid catalog url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        err: url::ParseError,
    },
    #[error(transparent)]
    MockData(#[from] MockDataError),
    #[error("{0}")]
    Other(String),
}

impl CatalogClientError {
    /// Whether the requested entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogClientError::NotFound(_))
    }

    /// Classify a transport error raised by reqwest.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogClientError::Timeout(err)
        } else if err.is_decode() {
            CatalogClientError::InvalidResponse(err)
        } else {
            CatalogClientError::Request(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum MockDataError {
    /// Failed to read the JSON file containing mock responses
    #[error("failed to read mock response file")]
    ReadMockFile(#[source] std::io::Error),
    /// Failed to parse the contents of the mock data file as JSON
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
    /// The data was parsed as JSON but it wasn't semantically valid
    #[error("invalid mocked data: {0}")]
    InvalidData(String),
    #[error("no mock response left for {0}")]
    Exhausted(String),
}

/// Error returned when parsing an [crate::EntryKey] from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("a name or number is required")]
    Empty,
    #[error("entry numbers start at 1")]
    ZeroId,
    #[error("'{0}' is not a valid entry number")]
    IdOutOfRange(String),
}
