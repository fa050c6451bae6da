//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::time::Duration;

/// Base URL of the public PokeAPI service.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2/";
/// Every catalog request is abandoned after this long.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    pub catalog_url: String,
    /// Timeout applied to each request, including reading the body.
    pub request_timeout: Duration,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Override for the `user-agent` header.
    pub user_agent: Option<String>,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            extra_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}
