use anyhow::{Context, Result, bail};
use bpaf::Bpaf;
use pokedex_catalog::{ClientTrait, EntryKey};
use pokedex_rust_sdk::models::details::{DetailState, DetailView};
use pokedex_rust_sdk::models::favorites::Favorites;
use tracing::instrument;

use crate::shell::DetailsScreen;

// Show a single entry
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the entry as JSON
    #[bpaf(long)]
    pub json: bool,

    /// Name or number of the entry, e.g. 'pikachu' or '25'
    #[bpaf(positional("name-or-number"))]
    pub key: String,
}

impl Show {
    #[instrument(name = "show", skip_all, fields(key = self.key))]
    pub async fn handle(self, client: &impl ClientTrait) -> Result<()> {
        let key: EntryKey = self
            .key
            .parse()
            .with_context(|| format!("Invalid entry '{}'", self.key))?;

        // favorites are not kept between runs, so nothing is ever marked
        let mut view = DetailView::new(Favorites::new());
        view.load(client, key).await;
        match view.state() {
            DetailState::Loaded { entry, .. } if self.json => {
                println!("{}", serde_json::to_string_pretty(entry)?);
            },
            DetailState::Loaded { .. } => print!("{}", DetailsScreen(&view)),
            DetailState::Failed(err) => bail!(*err),
            state => bail!("unexpected details state: {state:?}"),
        }
        Ok(())
    }
}
