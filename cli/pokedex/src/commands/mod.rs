mod browse;
mod list;
mod show;

use std::num::NonZeroU32;

use anyhow::Result;
use bpaf::Bpaf;
use indoc::indoc;
use tracing::debug;

use crate::config::Config;
use crate::utils::init::init_catalog_client;

static POKEDEX_DESCRIPTION: &'_ str = indoc! {"
    Browse the creature catalog of PokeAPI from your terminal.

    Without a command, an interactive session is started."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, version, descr(POKEDEX_DESCRIPTION))]
pub struct PokedexCli(#[bpaf(external(pokedex_args))] pub PokedexArgs);

/// Main pokedex args parser
///
/// To parse the pokedex CLI, use [`PokedexCli`] instead using [`pokedex_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)]
pub struct PokedexArgs {
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Base URL of the catalog service
    #[bpaf(long, argument("URL"))]
    pub catalog_url: Option<String>,

    /// Number of entries to load per page
    #[bpaf(long, argument("N"))]
    pub page_size: Option<NonZeroU32>,

    #[bpaf(external(commands), optional)]
    command: Option<Commands>,
}

impl PokedexArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        let config = config.with_overrides(self.catalog_url, self.page_size);
        debug!(?config, "effective config");

        let client = init_catalog_client(&config)?;

        match self.command.unwrap_or_default() {
            Commands::List(args) => args.handle(&config, &client).await,
            Commands::Show(args) => args.handle(&client).await,
            Commands::Browse(args) => args.handle(&config, client).await,
        }
    }
}

#[derive(Debug, Bpaf, Clone)]
enum Commands {
    /// Print one page of the catalog
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),

    /// Show a single entry by name or number
    #[bpaf(command)]
    Show(#[bpaf(external(show::show))] show::Show),

    /// Browse the catalog interactively (default)
    #[bpaf(command)]
    Browse(#[bpaf(external(browse::browse))] browse::Browse),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Browse(browse::Browse {})
    }
}
