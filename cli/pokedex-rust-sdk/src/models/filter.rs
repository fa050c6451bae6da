//! Client-side filtering of fetched summaries.
//!
//! Filtering only narrows what has already been fetched,
//! it never stands in for a search on the catalog service.

use pokedex_catalog::CatalogSummary;

/// Normalize user input into the needle [matches] expects.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `summary` survives the filter `needle`.
///
/// `needle` must already be [normalize]d. A summary matches if its name
/// contains the needle, ignoring case, or if its numeric id contains it.
/// An empty needle matches everything.
pub fn matches(summary: &CatalogSummary, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    summary.name.to_lowercase().contains(needle)
        || summary
            .id()
            .is_some_and(|id| id.to_string().contains(needle))
}

/// The summaries matching `text`, in their original order.
pub fn filter_summaries<'a>(
    summaries: &'a [CatalogSummary],
    text: &str,
) -> impl Iterator<Item = &'a CatalogSummary> + use<'a> {
    let needle = normalize(text);
    summaries
        .iter()
        .filter(move |summary| matches(summary, &needle))
}

/// Positions of the summaries matching `text`.
pub(crate) fn matching_indices(summaries: &[CatalogSummary], text: &str) -> Vec<usize> {
    let needle = normalize(text);
    summaries
        .iter()
        .enumerate()
        .filter(|(_, summary)| matches(summary, &needle))
        .map(|(index, _)| index)
        .collect()
}
