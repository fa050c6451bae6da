//! Fixtures shared by the tests of this and dependent crates.

use std::ops::Range;

use crate::types::{CatalogEntry, CatalogSummary, EntryAbility, EntryType, SummaryPage};

/// A summary as the paging endpoint would return it for `id`.
pub fn summary(name: &str, id: u32) -> CatalogSummary {
    CatalogSummary::new(name, format!("https://pokeapi.co/api/v2/pokemon/{id}/"))
}

/// Summaries named `entry-<id>` for every id in `ids`.
pub fn summaries(ids: Range<u32>) -> Vec<CatalogSummary> {
    ids.map(|id| summary(&format!("entry-{id}"), id)).collect()
}

/// A page holding the summaries for `ids` out of `count` total entries.
pub fn page(ids: Range<u32>, count: u64) -> SummaryPage {
    SummaryPage {
        results: summaries(ids),
        count,
    }
}

pub fn pikachu() -> CatalogEntry {
    CatalogEntry {
        id: 25,
        name: "pikachu".to_string(),
        image_primary: Some("https://example.com/front/25.png".to_string()),
        image_artwork: Some("https://example.com/artwork/25.png".to_string()),
        types: vec![EntryType {
            slot: 1,
            type_name: "electric".to_string(),
        }],
        abilities: vec![
            EntryAbility {
                ability_name: "static".to_string(),
            },
            EntryAbility {
                ability_name: "lightning-rod".to_string(),
            },
        ],
    }
}

pub fn bulbasaur() -> CatalogEntry {
    CatalogEntry {
        id: 1,
        name: "bulbasaur".to_string(),
        image_primary: Some("https://example.com/front/1.png".to_string()),
        image_artwork: None,
        types: vec![
            EntryType {
                slot: 1,
                type_name: "grass".to_string(),
            },
            EntryType {
                slot: 2,
                type_name: "poison".to_string(),
            },
        ],
        abilities: vec![EntryAbility {
            ability_name: "overgrow".to_string(),
        }],
    }
}
