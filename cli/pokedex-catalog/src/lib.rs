//! HTTP client infrastructure for the PokeAPI creature catalog.
//!
//! This crate provides:
//! - HTTP client construction with a fixed request timeout
//! - Domain types for catalog pages and entry records
//! - Common error handling for catalog operations
//! - A mock client seeded with canned responses for tests and offline runs
//!
//! ## Usage
//!
//! ```ignore
//! use pokedex_catalog::{CatalogClient, CatalogClientConfig, ClientTrait};
//!
//! let client = CatalogClient::new(CatalogClientConfig::default())?;
//! let page = client.list_page(20, 0).await?;
//! let entry = client.get_by_key(&"pikachu".parse()?).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
pub mod types;

#[cfg(any(test, feature = "tests"))]
pub mod test_helpers;

// Public exports
pub use client::{CatalogClient, Client, ClientTrait};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{CatalogClientError, KeyParseError, MockDataError};
pub use mock::{ErrorResponse, MockClient, MockRequest, Response};
pub use types::{CatalogEntry, CatalogSummary, EntryKey, SummaryPage};
