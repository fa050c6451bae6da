use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use pokedex_catalog::{CatalogClient, CatalogClientConfig, Client, MockClient};
use tracing::debug;

use crate::config::Config;
use crate::utils::message;

/// Path to a JSON file with canned catalog responses.
///
/// When set, the CLI serves every request from that file
/// instead of talking to the catalog service.
pub const CATALOG_MOCK_DATA_VAR: &str = "_POKEDEX_USE_CATALOG_MOCK";

/// Initialize the catalog client
///
/// - Initialize a mock client if `_POKEDEX_USE_CATALOG_MOCK` points at mock data
/// - Initialize a real client otherwise
pub fn init_catalog_client(config: &Config) -> Result<Client> {
    if let Ok(path_str) = std::env::var(CATALOG_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock catalog client");
        message::warning(format!(
            "Using mock catalog data from {}, '${CATALOG_MOCK_DATA_VAR}' is meant for testing only.",
            path.display()
        ));
        let client = MockClient::new(Some(&path))
            .with_context(|| format!("could not load mock data from {}", path.display()))?;
        return Ok(client.into());
    }

    let client_config = CatalogClientConfig {
        catalog_url: config.catalog_url.clone(),
        request_timeout: config.request_timeout(),
        ..Default::default()
    };

    debug!(catalog_url = %client_config.catalog_url, "using catalog client");
    let client = CatalogClient::new(client_config).context("could not create catalog client")?;
    Ok(client.into())
}
