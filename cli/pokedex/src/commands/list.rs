use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use pokedex_catalog::{ClientTrait, SummaryPage};
use pokedex_rust_sdk::models::filter::filter_summaries;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::shell::ListItem;
use crate::utils::message;

// Print one page of the catalog
#[derive(Debug, Bpaf, Clone)]
pub struct List {
    /// Display the page as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Number of entries to request, defaults to the configured page size
    #[bpaf(long, argument("N"))]
    pub limit: Option<NonZeroU32>,

    /// Number of entries to skip
    #[bpaf(long, argument("N"), fallback(0))]
    pub offset: u32,

    /// Only show entries whose name or number contains TEXT
    #[bpaf(long, argument("TEXT"))]
    pub filter: Option<String>,
}

impl List {
    #[instrument(name = "list", skip_all, fields(json = self.json, offset = self.offset))]
    pub async fn handle(self, config: &Config, client: &impl ClientTrait) -> Result<()> {
        let limit = self.limit.unwrap_or(config.page_size()).get();
        debug!(limit, offset = self.offset, "listing catalog page");

        let page = client
            .list_page(limit, self.offset)
            .await
            .context("Could not load the list")?;

        let filter = self.filter.unwrap_or_default();
        let results = filter_summaries(&page.results, &filter)
            .cloned()
            .collect::<Vec<_>>();

        if self.json {
            let filtered = SummaryPage {
                results,
                count: page.count,
            };
            println!("{}", serde_json::to_string_pretty(&filtered)?);
            return Ok(());
        }

        print!("{}", render_list(&results, self.offset));
        message::plain(format!(
            "showing {} of {} loaded (total {})",
            results.len(),
            page.results.len(),
            page.count
        ));
        Ok(())
    }
}

/// Numbered lines, counting from the offset of the page.
fn render_list(results: &[pokedex_catalog::CatalogSummary], offset: u32) -> String {
    let start = offset as usize + 1;
    results
        .iter()
        .enumerate()
        .map(|(index, summary)| format!("{}\n", ListItem::from_summary(start + index, summary)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pokedex_catalog::test_helpers::{page, summary};
    use pokedex_catalog::{MockClient, MockRequest};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::message::history::History;

    fn list(limit: Option<u32>, offset: u32, filter: Option<&str>) -> List {
        List {
            json: false,
            limit: limit.and_then(NonZeroU32::new),
            offset,
            filter: filter.map(ToString::to_string),
        }
    }

    #[test]
    fn positions_continue_from_offset() {
        let rendered = render_list(&[summary("raichu", 26)], 25);
        assert!(rendered.starts_with("  26. raichu"), "{rendered}");
    }

    #[tokio::test]
    async fn requests_configured_page_size() {
        let client = MockClient::default();
        client.push_page_response(page(41..46, 1302));
        let config = Config {
            page_size: 5,
            ..Default::default()
        };

        list(None, 40, None).handle(&config, &client).await.unwrap();
        assert_eq!(client.requests(), vec![MockRequest::ListPage {
            limit: 5,
            offset: 40
        }]);
    }

    #[tokio::test]
    async fn filter_applies_to_the_fetched_page() {
        let client = MockClient::default();
        client.push_page_response(page(1..30, 1302));
        History::global().clear();

        list(Some(29), 0, Some("25"))
            .handle(&Config::default(), &client)
            .await
            .unwrap();

        let messages = History::global().messages();
        assert_eq!(messages.back().map(String::as_str), Some(
            "showing 1 of 29 loaded (total 1302)"
        ));
    }

    #[tokio::test]
    async fn failure_is_reported() {
        let client = MockClient::default();
        client.push_error_response(500);

        let err = list(None, 0, None)
            .handle(&Config::default(), &client)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Could not load the list"), "{err}");
    }
}
