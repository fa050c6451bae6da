//! Direct lookup of an entry by name or number.

use pokedex_catalog::{CatalogEntry, ClientTrait, EntryKey, KeyParseError};
use tracing::debug;

use super::ScreenError;

/// Resolve `term` to an entry.
///
/// Returns `Ok(None)` without making a request when the term is blank.
/// This asks the catalog for exactly one key, it does not search.
pub async fn lookup_entry(
    client: &impl ClientTrait,
    term: &str,
) -> Result<Option<CatalogEntry>, ScreenError> {
    let key = match term.parse::<EntryKey>() {
        Ok(key) => key,
        Err(KeyParseError::Empty) => {
            debug!("blank search term, not looking anything up");
            return Ok(None);
        },
        // Numbers the catalog cannot know about
        Err(err) => {
            debug!(term, error = %err, "search term is not a valid key");
            return Err(ScreenError::NotFound);
        },
    };

    match client.get_by_key(&key).await {
        Ok(entry) => {
            debug!(%key, id = entry.id, "search resolved entry");
            Ok(Some(entry))
        },
        Err(err) => {
            debug!(%key, error = %err, "search failed");
            Err(ScreenError::for_lookup(&err))
        },
    }
}
