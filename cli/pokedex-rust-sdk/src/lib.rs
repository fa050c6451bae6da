//! State containers behind the catalog browser screens.
//!
//! Nothing in here knows about terminals or rendering.
//! Screens drive these models and render whatever state they expose.

pub mod models;

pub use pokedex_catalog as catalog;
