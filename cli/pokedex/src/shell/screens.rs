//! Plain text rendering of the browser screens.

use std::fmt::{self, Display};

use itertools::Itertools;
use pokedex_catalog::CatalogSummary;
use pokedex_rust_sdk::models::browser::{BrowserState, CatalogBrowser};
use pokedex_rust_sdk::models::details::{DetailState, DetailView};
use pokedex_rust_sdk::models::favorites::FavoriteEntry;

/// One numbered line of a list, shared by the catalog and favorites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub position: usize,
    pub name: String,
    pub id: Option<u32>,
    pub image: Option<String>,
}

impl ListItem {
    pub fn from_summary(position: usize, summary: &CatalogSummary) -> Self {
        Self {
            position,
            name: summary.name.clone(),
            id: summary.id(),
            image: summary.image_url(),
        }
    }

    pub fn from_favorite(position: usize, favorite: &FavoriteEntry) -> Self {
        Self {
            position,
            name: favorite.name.clone(),
            id: Some(favorite.id),
            image: Some(favorite.display_image()),
        }
    }
}

impl Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self.id {
            Some(id) => format!("#{id}"),
            None => "#?".to_string(),
        };
        write!(f, "{:>4}. {:<20} {:>6}", self.position, self.name, id)?;
        if let Some(image) = &self.image {
            write!(f, "  {image}")?;
        }
        Ok(())
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: impl IntoIterator<Item = ListItem>) -> fmt::Result {
    for item in items {
        writeln!(f, "{item}")?;
    }
    Ok(())
}

pub struct CatalogScreen<'a>(pub &'a CatalogBrowser);

impl Display for CatalogScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let browser = self.0;
        writeln!(f, "Pokedex")?;

        let filter = browser.filter_text().trim();
        if !filter.is_empty() {
            writeln!(f, "filter: \"{filter}\"")?;
        }

        let view = browser.view();
        write_items(
            f,
            view.iter()
                .enumerate()
                .map(|(index, summary)| ListItem::from_summary(index + 1, summary)),
        )?;

        if view.is_empty() && !browser.fetched().is_empty() {
            writeln!(f, "No loaded entries match the filter.")?;
        }

        let total = match browser.total_count() {
            Some(total) => total.to_string(),
            None => "unknown".to_string(),
        };
        writeln!(
            f,
            "showing {} of {} loaded (total {total})",
            view.len(),
            browser.fetched().len()
        )?;

        match browser.state() {
            BrowserState::Idle => {},
            BrowserState::Loading(_) => writeln!(f, "Loading...")?,
            BrowserState::Loaded { complete: true } => writeln!(f, "All entries loaded.")?,
            BrowserState::Loaded { complete: false } => {
                writeln!(f, "Type 'more' to load more entries.")?
            },
            BrowserState::Error => {},
        }

        if let Some(error) = browser.last_error() {
            writeln!(f, "{error}")?;
            writeln!(f, "Type 'retry' to try again.")?;
        }
        Ok(())
    }
}

pub struct FavoritesScreen<'a>(pub &'a [FavoriteEntry]);

impl Display for FavoritesScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Favorites")?;
        if self.0.is_empty() {
            return writeln!(f, "No favorites yet. Open an entry and type 'fav' to add it.");
        }
        write_items(
            f,
            self.0
                .iter()
                .enumerate()
                .map(|(index, favorite)| ListItem::from_favorite(index + 1, favorite)),
        )
    }
}

pub struct DetailsScreen<'a>(pub &'a DetailView);

impl Display for DetailsScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        match view.state() {
            DetailState::Inactive => Ok(()),
            DetailState::Loading(key) => writeln!(f, "Loading details for {key}..."),
            DetailState::Failed(error) => {
                writeln!(f, "{error}")?;
                writeln!(f, "Type 'retry' to try again or 'back' to return.")
            },
            DetailState::Loaded { entry, image } => {
                let marker = if view.is_favorited() { "★" } else { "☆" };
                writeln!(f, "{}  #{:03}  {marker}", entry.name, entry.id)?;
                writeln!(f, "image:     {}", image.location())?;
                let types = entry.types.iter().map(|t| &t.type_name).join(", ");
                writeln!(f, "types:     {types}")?;
                let abilities = entry.abilities.iter().map(|a| &a.ability_name).join(", ");
                writeln!(f, "abilities: {abilities}")
            },
        }
    }
}
