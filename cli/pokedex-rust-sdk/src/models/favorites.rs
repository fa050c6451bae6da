//! The in-memory favorites registry.
//!
//! Favorites live for as long as the session does and are never written
//! anywhere. Screens receive a [Favorites] handle, every clone of which
//! refers to the same registry.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use pokedex_catalog::CatalogEntry;
use pokedex_catalog::types::sprite_url;
use tracing::debug;

/// An entry the user marked as favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub id: u32,
    pub name: String,
    pub image_url: Option<String>,
}

impl FavoriteEntry {
    pub fn new(id: u32, name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url,
        }
    }

    /// The image to render, the sprite for the id if none was recorded.
    pub fn display_image(&self) -> String {
        self.image_url.clone().unwrap_or_else(|| sprite_url(self.id))
    }
}

impl From<&CatalogEntry> for FavoriteEntry {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            image_url: entry.best_image().map(ToString::to_string),
        }
    }
}

/// Favorites keyed by id, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct FavoritesRegistry {
    entries: IndexMap<u32, FavoriteEntry>,
}

impl FavoritesRegistry {
    /// Add `entry` unless its id is already present.
    ///
    /// Returns whether the entry was inserted.
    pub fn add(&mut self, entry: FavoriteEntry) -> bool {
        if self.entries.contains_key(&entry.id) {
            return false;
        }
        debug!(id = entry.id, name = %entry.name, "added favorite");
        self.entries.insert(entry.id, entry);
        true
    }

    /// Remove the entry with `id`, keeping the order of the rest.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let removed = self.entries.shift_remove(&id);
        if let Some(entry) = &removed {
            debug!(id, name = %entry.name, "removed favorite");
        }
        removed.is_some()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove the entry if it is present, add it otherwise.
    ///
    /// Returns whether the entry is a favorite afterwards.
    pub fn toggle(&mut self, entry: FavoriteEntry) -> bool {
        if self.remove(entry.id) {
            false
        } else {
            self.add(entry)
        }
    }

    pub fn list(&self) -> Vec<FavoriteEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to a [FavoritesRegistry].
#[derive(Debug, Clone, Default)]
pub struct Favorites(Arc<RwLock<FavoritesRegistry>>);

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, FavoritesRegistry> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FavoritesRegistry> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, entry: FavoriteEntry) -> bool {
        self.write().add(entry)
    }

    pub fn remove(&self, id: u32) -> bool {
        self.write().remove(id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.read().contains(id)
    }

    pub fn toggle(&self, entry: FavoriteEntry) -> bool {
        self.write().toggle(entry)
    }

    /// A snapshot of the current favorites in the order they were added.
    pub fn list(&self) -> Vec<FavoriteEntry> {
        self.read().list()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
