//! Catalog client for the PokeAPI creature catalog.

use std::fmt::Debug;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{CONNECT_TIMEOUT, CatalogClientConfig};
use crate::error::CatalogClientError;
use crate::mock::MockClient;
use crate::types::{CatalogEntry, EntryKey, SummaryPage};

const ENTRIES_PATH: &str = "pokemon";

/// A client for the catalog service.
///
/// This is a thin wrapper around a [reqwest::Client] that handles:
/// - HTTP client configuration with timeouts
/// - Construction of endpoint URLs relative to the configured base
/// - Mapping of response statuses to [CatalogClientError]
///
/// There is no retry, backoff or caching.
/// Every call issues exactly one request.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let base_url = parse_base_url(&config.catalog_url)?;
        let http = build_http_client(&config)?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    /// Append `segments` to the base URL, percent-encoding each of them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogClientError::Other(format!(
                    "catalog url '{}' cannot have a path",
                    self.config.catalog_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The complete catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog service via [`CatalogClient`]
/// - **Mock**: canned responses without HTTP via [`MockClient`]
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Fetch `limit` summaries starting at `offset`,
    /// together with the total number of entries in the catalog.
    async fn list_page(&self, limit: u32, offset: u32) -> Result<SummaryPage, CatalogClientError>;

    /// Fetch the full record of a single entry by name or number.
    async fn get_by_key(&self, key: &EntryKey) -> Result<CatalogEntry, CatalogClientError>;
}

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

// ---------------------------------------------------------------------------
// ClientTrait implementation for CatalogClient
// ---------------------------------------------------------------------------

impl ClientTrait for CatalogClient {
    #[instrument(skip(self), fields(catalog_url = %self.config.catalog_url))]
    async fn list_page(&self, limit: u32, offset: u32) -> Result<SummaryPage, CatalogClientError> {
        let url = self.endpoint(&[ENTRIES_PATH])?;
        debug!(%url, "requesting catalog page");

        let response = self
            .http
            .get(url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(CatalogClientError::from_transport)?;

        let page: SummaryPage = decode_response(response, || format!("page at offset {offset}")).await?;

        debug!(
            n_results = page.results.len(),
            total_count = page.count,
            "received catalog page"
        );
        Ok(page)
    }

    #[instrument(skip_all, fields(key = %key))]
    async fn get_by_key(&self, key: &EntryKey) -> Result<CatalogEntry, CatalogClientError> {
        let segment = key.to_string();
        let url = self.endpoint(&[ENTRIES_PATH, segment.as_str()])?;
        debug!(%url, "requesting catalog entry");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(CatalogClientError::from_transport)?;

        let entry: CatalogEntry = decode_response(response, || segment.clone()).await?;

        debug!(id = entry.id, name = %entry.name, "received catalog entry");
        Ok(entry)
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn parse_base_url(catalog_url: &str) -> Result<Url, CatalogClientError> {
    let url = Url::parse(catalog_url).map_err(|err| CatalogClientError::InvalidUrl {
        url: catalog_url.to_string(),
        err,
    })?;

    if url.cannot_be_a_base() {
        return Err(CatalogClientError::InvalidUrl {
            url: catalog_url.to_string(),
            err: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        });
    }

    Ok(url)
}

/// Check the status of a response and decode its JSON body.
///
/// `subject` names what was requested and is only evaluated for 404s.
async fn decode_response<T: DeserializeOwned>(
    response: Response,
    subject: impl FnOnce() -> String,
) -> Result<T, CatalogClientError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(CatalogClientError::NotFound(subject()));
    }
    if !status.is_success() {
        return Err(CatalogClientError::UnexpectedStatus(status));
    }

    response
        .json::<T>()
        .await
        .map_err(CatalogClientError::from_transport)
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client used for all catalog requests.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        timeout = ?config.request_timeout,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("pokedex-cli/{}", env!("CARGO_PKG_VERSION")));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.request_timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_helpers::{page, pikachu};

    fn client_config(url: &str) -> CatalogClientConfig {
        CatalogClientConfig {
            catalog_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_page_sends_limit_and_offset() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/pokemon")
                .query_param("limit", "20")
                .query_param("offset", "40");
            then.status(200).json_body_obj(&page(41..61, 1302));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let response = client.list_page(20, 40).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response, page(41..61, 1302));
    }

    #[tokio::test]
    async fn endpoint_is_relative_to_base_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v2/pokemon/pikachu");
            then.status(200).json_body_obj(&pikachu());
        });

        // no trailing slash on purpose
        let client = CatalogClient::new(client_config(&server.url("/api/v2"))).unwrap();
        let entry = client.get_by_key(&EntryKey::name("Pikachu")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry, pikachu());
    }

    #[tokio::test]
    async fn get_by_id_uses_number_as_segment() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/pokemon/25");
            then.status(200).json_body(json!({
                "id": 25,
                "name": "pikachu",
                "sprites": { "front_default": null },
                "types": [],
                "abilities": []
            }));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let entry = client.get_by_key(&EntryKey::Id(25)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry.id, 25);
        assert_eq!(entry.best_image(), None);
    }

    /// 404 responses are mapped to [CatalogClientError::NotFound],
    /// so consumers don't need to inspect raw status codes
    #[tokio::test]
    async fn get_by_key_not_found() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.path("/pokemon/no-such-name");
            then.status(404).body("Not Found");
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.get_by_key(&EntryKey::name("no-such-name")).await;

        mock.assert_async().await;
        assert!(
            matches!(&result, Err(CatalogClientError::NotFound(key)) if key == "no-such-name"),
            "expected CatalogClientError::NotFound, found: {result:?}"
        );
    }

    /// Other error statuses are reported as they are
    #[tokio::test]
    async fn list_page_unexpected_status() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(503).body("upstream unavailable");
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.list_page(20, 0).await;

        mock.assert_async().await;
        assert!(
            matches!(
                result,
                Err(CatalogClientError::UnexpectedStatus(status))
                    if status == StatusCode::SERVICE_UNAVAILABLE
            ),
            "expected UnexpectedStatus, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn list_page_invalid_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "unknown": "ceramic" }));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.list_page(20, 0).await;

        mock.assert_async().await;
        assert!(
            matches!(result, Err(CatalogClientError::InvalidResponse(_))),
            "expected InvalidResponse, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start_async().await;
        server.mock(|_, then| {
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body_obj(&page(1..21, 1302));
        });

        let config = CatalogClientConfig {
            request_timeout: Duration::from_millis(50),
            ..client_config(&server.base_url())
        };
        let client = CatalogClient::new(config).unwrap();
        let result = client.list_page(20, 0).await;

        assert!(
            matches!(result, Err(CatalogClientError::Timeout(_))),
            "expected Timeout, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn extra_headers_set_on_all_requests() {
        let mut extra_headers: BTreeMap<String, String> = BTreeMap::new();
        extra_headers.insert("pokedex-test".to_string(), "test-value".to_string());

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("pokedex-test", "test-value");
            then.status(200).json_body_obj(&page(0..0, 0));
        });

        let config = CatalogClientConfig {
            extra_headers,
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.list_page(20, 0).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn user_agent_set_on_all_requests() {
        let expected_agent = "my-custom-user-agent";

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("user-agent", expected_agent);
            then.status(200).json_body_obj(&page(0..0, 0));
        });

        let config = CatalogClientConfig {
            user_agent: Some(expected_agent.to_owned()),
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.list_page(20, 0).await;
        mock.assert_async().await;
    }

    #[test]
    fn invalid_catalog_url_is_rejected() {
        let result = CatalogClient::new(client_config("not a url"));
        assert!(
            matches!(result, Err(CatalogClientError::InvalidUrl { .. })),
            "expected InvalidUrl, found: {result:?}"
        );

        let result = CatalogClient::new(client_config("mailto:ash@example.com"));
        assert!(
            matches!(result, Err(CatalogClientError::InvalidUrl { .. })),
            "expected InvalidUrl, found: {result:?}"
        );
    }
}
