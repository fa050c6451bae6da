use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config as HierarchicalConfig, Environment};
use pokedex_catalog::{DEFAULT_CATALOG_URL, DEFAULT_REQUEST_TIMEOUT};
use pokedex_rust_sdk::models::browser::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the pokedex config directory
const POKEDEX_DIR_NAME: &str = "pokedex";
const POKEDEX_CONFIG_DIR_VAR: &str = "POKEDEX_CONFIG_DIR";
pub const POKEDEX_CONFIG_FILE: &str = "pokedex.toml";
/// Prefix of environment variables overriding config values
const ENV_PREFIX: &str = "POKEDEX";

/// Describes the configuration of the pokedex CLI
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog service
    // Kept as a String, parsing into a URL happens in the client.
    pub catalog_url: String,

    /// Number of entries requested per page
    pub page_size: u32,

    /// Seconds after which a catalog request is abandoned
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE.get(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Read the config from defaults, the config file and the environment.
    ///
    /// Later sources override earlier ones:
    /// 1. built-in defaults
    /// 2. `$POKEDEX_CONFIG_DIR/pokedex.toml`, or `$XDG_CONFIG_HOME/pokedex/pokedex.toml`
    /// 3. `POKEDEX_*` environment variables
    pub fn parse() -> Result<Config> {
        let config_file = config_dir()?.join(POKEDEX_CONFIG_FILE);
        debug!(config_file = %config_file.display(), "reading config");

        // Keys missing from every source fall back to `Config::default()`
        let raw = HierarchicalConfig::builder()
            .add_source(
                config::File::from(config_file)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Config = raw.try_deserialize().context("Could not parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("'page_size' must be greater than 0");
        }
        if self.request_timeout_secs == 0 {
            bail!("'request_timeout_secs' must be greater than 0");
        }
        Ok(())
    }

    /// Apply overrides passed on the command line.
    pub fn with_overrides(
        mut self,
        catalog_url: Option<String>,
        page_size: Option<NonZeroU32>,
    ) -> Self {
        if let Some(catalog_url) = catalog_url {
            self.catalog_url = catalog_url;
        }
        if let Some(page_size) = page_size {
            self.page_size = page_size.get();
        }
        self
    }

    pub fn page_size(&self) -> NonZeroU32 {
        NonZeroU32::new(self.page_size).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Directory holding the config file.
///
/// `$POKEDEX_CONFIG_DIR` if set, the platform config dir otherwise.
/// The directory is never created, a missing config file is not an error.
fn config_dir() -> Result<PathBuf> {
    match env::var(POKEDEX_CONFIG_DIR_VAR) {
        Ok(dir) => {
            debug!("`${POKEDEX_CONFIG_DIR_VAR}` set: {dir}");
            Ok(dir.into())
        },
        Err(_) => {
            let dir = dirs::config_dir()
                .context("Could not determine the user config directory")?
                .join(POKEDEX_DIR_NAME);
            debug!("`${POKEDEX_CONFIG_DIR_VAR}` not set, using {dir:?}");
            Ok(dir)
        },
    }
}
