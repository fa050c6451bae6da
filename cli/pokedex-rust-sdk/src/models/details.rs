//! State of the details screen for a single entry.

use pokedex_catalog::{CatalogClientError, CatalogEntry, ClientTrait, EntryKey};
use tracing::debug;

use super::favorites::{FavoriteEntry, Favorites};
use super::{Generation, ScreenError};

/// Bundled image shown when an entry has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "assets/pokeball.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayImage {
    Remote(String),
    Placeholder,
}

impl DisplayImage {
    fn for_entry(entry: &CatalogEntry) -> Self {
        match entry.best_image() {
            Some(url) => DisplayImage::Remote(url.to_string()),
            None => DisplayImage::Placeholder,
        }
    }

    /// URL or local path of the image.
    pub fn location(&self) -> &str {
        match self {
            DisplayImage::Remote(url) => url,
            DisplayImage::Placeholder => PLACEHOLDER_IMAGE,
        }
    }
}

/// A lookup handed out by [DetailView::activate].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub key: EntryKey,
    generation: Generation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Inactive,
    Loading(EntryKey),
    Loaded {
        entry: CatalogEntry,
        image: DisplayImage,
    },
    Failed(ScreenError),
}

/// Loads one entry and toggles its favorite status.
#[derive(Debug)]
pub struct DetailView {
    favorites: Favorites,
    /// Key of the last activation, kept for retries.
    key: Option<EntryKey>,
    state: DetailState,
    generation: Generation,
}

impl DetailView {
    pub fn new(favorites: Favorites) -> Self {
        Self {
            favorites,
            key: None,
            state: DetailState::Inactive,
            generation: Generation::default(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn entry(&self) -> Option<&CatalogEntry> {
        match &self.state {
            DetailState::Loaded { entry, .. } => Some(entry),
            _ => None,
        }
    }

    /// The key of the last activation, if the view is active.
    pub fn key(&self) -> Option<&EntryKey> {
        self.key.as_ref()
    }

    /// Start loading `key`, superseding any earlier lookup.
    pub fn activate(&mut self, key: EntryKey) -> DetailRequest {
        let request = DetailRequest {
            key: key.clone(),
            generation: self.generation.advance(),
        };
        debug!(?request, "activated details");
        self.key = Some(key.clone());
        self.state = DetailState::Loading(key);
        request
    }

    /// Apply the result of `request`, unless it has been superseded.
    pub fn finish(
        &mut self,
        request: DetailRequest,
        result: Result<CatalogEntry, CatalogClientError>,
    ) -> bool {
        if request.generation != self.generation
            || !matches!(&self.state, DetailState::Loading(key) if *key == request.key)
        {
            debug!(?request, "discarding result of superseded lookup");
            return false;
        }

        self.state = match result {
            Ok(entry) => {
                let image = DisplayImage::for_entry(&entry);
                debug!(id = entry.id, name = %entry.name, ?image, "loaded details");
                DetailState::Loaded { entry, image }
            },
            Err(err) => {
                debug!(key = %request.key, error = %err, "failed to load details");
                DetailState::Failed(ScreenError::for_lookup(&err))
            },
        };
        true
    }

    /// Activate for `key` and apply the lookup result.
    pub async fn load(&mut self, client: &impl ClientTrait, key: EntryKey) -> &DetailState {
        let request = self.activate(key);
        let result = client.get_by_key(&request.key).await;
        self.finish(request, result);
        &self.state
    }

    /// Look up the last key again, if there is one.
    pub async fn retry(&mut self, client: &impl ClientTrait) -> Option<&DetailState> {
        let key = self.key.clone()?;
        Some(self.load(client, key).await)
    }

    /// Leave the screen, results still in flight will be dropped.
    pub fn deactivate(&mut self) {
        self.generation.advance();
        self.key = None;
        self.state = DetailState::Inactive;
    }

    /// Whether the loaded entry is a favorite.
    pub fn is_favorited(&self) -> bool {
        self.entry()
            .is_some_and(|entry| self.favorites.contains(entry.id))
    }

    /// Flip the favorite status of the loaded entry.
    ///
    /// Returns the new status, or `None` if no entry is loaded.
    pub fn toggle_favorite(&self) -> Option<bool> {
        let entry = self.entry()?;
        let favorited = self.favorites.toggle(FavoriteEntry::from(entry));
        debug!(id = entry.id, favorited, "toggled favorite");
        Some(favorited)
    }
}
