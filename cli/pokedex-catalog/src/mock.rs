//! A catalog client that serves canned responses.
//!
//! Used by tests throughout the workspace and by the CLI when pointed at a
//! mock data file, so the application can run without network access.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ClientTrait;
use crate::error::{CatalogClientError, MockDataError};
use crate::types::{CatalogEntry, EntryKey, SummaryPage};

// Arc allows you to push things into the client from outside the client if necessary
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// An error status returned in place of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
}

/// A single canned response.
///
/// Mock data files contain a JSON array of these,
/// using the same JSON shapes the catalog service responds with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Page(SummaryPage),
    Entry(CatalogEntry),
    Error(ErrorResponse),
}

/// A request received by a [MockClient].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    ListPage { limit: u32, offset: u32 },
    GetByKey(EntryKey),
}

/// Reads a list of mock responses from disk.
fn read_mock_responses(path: impl AsRef<Path>) -> Result<VecDeque<Response>, MockDataError> {
    let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
    let deserialized: Vec<Response> =
        serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;
    Ok(deserialized.into())
}

/// A catalog client that can be seeded with mock responses.
///
/// Responses are served in the order they were pushed, regardless of the
/// kind of request. Cloning the client shares the response queue and the
/// request log, which lets tests inspect requests after handing the client
/// off.
#[derive(Debug, Default, Clone)]
pub struct MockClient {
    mock_responses: MockField<VecDeque<Response>>,
    requests: MockField<Vec<MockRequest>>,
}

impl MockClient {
    /// Create a new mock client, potentially reading mock responses from disk
    pub fn new(mock_data_path: Option<impl AsRef<Path>>) -> Result<Self, MockDataError> {
        let mock_responses = match mock_data_path {
            Some(path) => read_mock_responses(path)?,
            None => VecDeque::new(),
        };
        debug!(n_responses = mock_responses.len(), "created mock catalog client");
        Ok(Self {
            mock_responses: Arc::new(Mutex::new(mock_responses)),
            requests: Default::default(),
        })
    }

    /// Push a new response into the list of mock responses
    pub fn push_response(&self, response: Response) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    pub fn push_page_response(&self, page: SummaryPage) {
        self.push_response(Response::Page(page));
    }

    pub fn push_entry_response(&self, entry: CatalogEntry) {
        self.push_response(Response::Entry(entry));
    }

    /// Push an error status into the list of mock responses
    pub fn push_error_response(&self, status: u16) {
        self.push_response(Response::Error(ErrorResponse { status }));
    }

    /// Number of responses not yet served.
    pub fn remaining_responses(&self) -> usize {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .len()
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    /// Record `request` and pop the response for it.
    fn respond(&self, request: MockRequest) -> Result<Response, CatalogClientError> {
        let description = format!("{request:?}");
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .push(request);

        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front()
            .ok_or_else(|| MockDataError::Exhausted(description).into())
    }
}

impl ErrorResponse {
    fn into_error(self, subject: String) -> CatalogClientError {
        match StatusCode::from_u16(self.status) {
            Ok(status) if status == StatusCode::NOT_FOUND => CatalogClientError::NotFound(subject),
            Ok(status) => CatalogClientError::UnexpectedStatus(status),
            Err(_) => MockDataError::InvalidData(format!("invalid status code {}", self.status))
                .into(),
        }
    }
}

impl ClientTrait for MockClient {
    async fn list_page(&self, limit: u32, offset: u32) -> Result<SummaryPage, CatalogClientError> {
        match self.respond(MockRequest::ListPage { limit, offset })? {
            Response::Page(page) => Ok(page),
            Response::Error(err) => Err(err.into_error(format!("page at offset {offset}"))),
            other => Err(MockDataError::InvalidData(format!(
                "expected a page response, found {other:?}"
            ))
            .into()),
        }
    }

    async fn get_by_key(&self, key: &EntryKey) -> Result<CatalogEntry, CatalogClientError> {
        match self.respond(MockRequest::GetByKey(key.clone()))? {
            Response::Entry(entry) => Ok(entry),
            Response::Error(err) => Err(err.into_error(key.to_string())),
            other => Err(MockDataError::InvalidData(format!(
                "expected an entry response, found {other:?}"
            ))
            .into()),
        }
    }
}
