//! Catalog interaction types.
//!
//! These types represent the domain model for catalog operations.
//! The detail record is decoded from the service's nested wire shape and
//! flattened into the few fields the application renders.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::KeyParseError;

/// Sprite repository serving a default image for every entry id.
pub const SPRITE_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

static LOCATOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pokemon/(\d+)/").expect("locator pattern is valid"));

/// The sprite URL for an entry id.
pub fn sprite_url(id: u32) -> String {
    format!("{SPRITE_BASE_URL}/{id}.png")
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Generic paginated result container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsPage<T> {
    pub results: Vec<T>,
    /// Total number of items the catalog holds, across all pages.
    pub count: u64,
}

pub type SummaryPage = ResultsPage<CatalogSummary>;

/// The lightweight list representation of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub name: String,
    /// URL of the full record, e.g. `https://pokeapi.co/api/v2/pokemon/25/`
    #[serde(rename = "url")]
    pub resource_locator: String,
}

impl CatalogSummary {
    pub fn new(name: impl Into<String>, resource_locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_locator: resource_locator.into(),
        }
    }

    /// The numeric id encoded in the resource locator, if there is one.
    pub fn id(&self) -> Option<u32> {
        LOCATOR_ID
            .captures(&self.resource_locator)
            .and_then(|captures| captures.get(1))
            .and_then(|id| id.as_str().parse().ok())
    }

    /// The sprite URL for this entry, if the locator carries an id.
    pub fn image_url(&self) -> Option<String> {
        self.id().map(sprite_url)
    }
}

// ---------------------------------------------------------------------------
// Entry records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryType {
    pub slot: u32,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryAbility {
    pub ability_name: String,
}

/// A full catalog entry as returned by a key lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryRecord", into = "EntryRecord")]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub image_primary: Option<String>,
    pub image_artwork: Option<String>,
    pub types: Vec<EntryType>,
    pub abilities: Vec<EntryAbility>,
}

impl CatalogEntry {
    /// The richest image available: artwork, then the primary sprite.
    pub fn best_image(&self) -> Option<&str> {
        self.image_artwork
            .as_deref()
            .or(self.image_primary.as_deref())
    }
}

/// Wire shape of `GET /pokemon/{key}`, restricted to the fields we use.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryRecord {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: Sprites,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OtherSprites {
    #[serde(
        rename = "official-artwork",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TypeSlot {
    slot: u32,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AbilitySlot {
    ability: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

impl NamedResource {
    fn named(name: String) -> Self {
        Self {
            name,
            url: String::new(),
        }
    }
}

impl From<EntryRecord> for CatalogEntry {
    fn from(record: EntryRecord) -> Self {
        let image_artwork = record
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|artwork| artwork.front_default);

        Self {
            id: record.id,
            name: record.name,
            image_primary: record.sprites.front_default,
            image_artwork,
            types: record
                .types
                .into_iter()
                .map(|slot| EntryType {
                    slot: slot.slot,
                    type_name: slot.kind.name,
                })
                .collect(),
            abilities: record
                .abilities
                .into_iter()
                .map(|slot| EntryAbility {
                    ability_name: slot.ability.name,
                })
                .collect(),
        }
    }
}

impl From<CatalogEntry> for EntryRecord {
    fn from(entry: CatalogEntry) -> Self {
        let other = entry.image_artwork.map(|front_default| OtherSprites {
            official_artwork: Some(Artwork {
                front_default: Some(front_default),
            }),
        });

        Self {
            id: entry.id,
            name: entry.name,
            sprites: Sprites {
                front_default: entry.image_primary,
                other,
            },
            types: entry
                .types
                .into_iter()
                .map(|t| TypeSlot {
                    slot: t.slot,
                    kind: NamedResource::named(t.type_name),
                })
                .collect(),
            abilities: entry
                .abilities
                .into_iter()
                .map(|a| AbilitySlot {
                    ability: NamedResource::named(a.ability_name),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup keys
// ---------------------------------------------------------------------------

/// Identifies an entry for `get_by_key`: either its name or its number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    Id(u32),
    /// Always lowercase, the catalog only knows lowercase names.
    Name(String),
}

impl EntryKey {
    /// Build a name key, normalizing case and surrounding whitespace.
    pub fn name(name: impl AsRef<str>) -> Self {
        EntryKey::Name(name.as_ref().trim().to_lowercase())
    }
}

impl From<u32> for EntryKey {
    fn from(id: u32) -> Self {
        EntryKey::Id(id)
    }
}

impl FromStr for EntryKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KeyParseError::Empty);
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let id: u32 = trimmed
                .parse()
                .map_err(|_| KeyParseError::IdOutOfRange(trimmed.to_string()))?;
            if id == 0 {
                return Err(KeyParseError::ZeroId);
            }
            return Ok(EntryKey::Id(id));
        }

        Ok(EntryKey::name(trimmed))
    }
}

impl Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKey::Id(id) => write!(f, "{id}"),
            EntryKey::Name(name) => write!(f, "{name}"),
        }
    }
}
