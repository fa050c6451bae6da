use pokedex_catalog::CatalogClientError;
use thiserror::Error;

/// What a screen tells the user when a fetch failed.
///
/// Client errors are collapsed into these at the screen boundary,
/// only a missing entry is told apart from any other failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("Could not load the list. Please try again.")]
    ListUnavailable,
    #[error("Could not load the details. Please try again.")]
    DetailsUnavailable,
    #[error("Entry not found. Check the name or number.")]
    NotFound,
}

impl ScreenError {
    /// The message for a failed entry lookup.
    pub fn for_lookup(err: &CatalogClientError) -> Self {
        if err.is_not_found() {
            ScreenError::NotFound
        } else {
            ScreenError::DetailsUnavailable
        }
    }
}
