//! The interactive browser session.
//!
//! A [Session] owns the catalog client, the favorites and one model per
//! screen, and applies [ShellCommand]s to them. Reading input and printing
//! output is left to the caller.

mod command;
mod navigator;
mod screens;

use std::num::NonZeroU32;

pub use command::{CommandParseError, HELP, OpenTarget, ShellCommand};
pub use navigator::{Navigator, Route};
use pokedex_catalog::{ClientTrait, EntryKey};
use pokedex_rust_sdk::models::ScreenError;
use pokedex_rust_sdk::models::browser::{CatalogBrowser, LoadOutcome};
use pokedex_rust_sdk::models::details::DetailView;
use pokedex_rust_sdk::models::favorites::Favorites;
use pokedex_rust_sdk::models::search::lookup_entry;
pub use screens::{CatalogScreen, DetailsScreen, FavoritesScreen, ListItem};
use tracing::{debug, instrument};

/// What the caller should show after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show the current screen.
    Screen,
    /// Show a short note, then the current screen.
    Notice(String),
    /// Show an error, then the current screen.
    Failed(ScreenError),
    Help,
    Quit,
}

pub struct Session<C> {
    client: C,
    favorites: Favorites,
    browser: CatalogBrowser,
    details: DetailView,
    navigator: Navigator,
}

impl<C: ClientTrait> Session<C> {
    pub fn new(client: C, page_size: NonZeroU32) -> Self {
        let favorites = Favorites::new();
        Self {
            client,
            browser: CatalogBrowser::new(page_size),
            details: DetailView::new(favorites.clone()),
            favorites,
            navigator: Navigator::default(),
        }
    }

    #[cfg(test)]
    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    #[cfg(test)]
    pub fn browser(&self) -> &CatalogBrowser {
        &self.browser
    }

    #[cfg(test)]
    pub fn details(&self) -> &DetailView {
        &self.details
    }

    #[cfg(test)]
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Load the first page of the catalog.
    pub async fn start(&mut self) -> LoadOutcome {
        self.browser.load_initial(&self.client).await
    }

    /// Render the screen of the current route.
    pub fn render(&self) -> String {
        match self.navigator.current() {
            Route::Catalog => CatalogScreen(&self.browser).to_string(),
            Route::Details(_) => DetailsScreen(&self.details).to_string(),
            Route::Favorites => FavoritesScreen(&self.favorites.list()).to_string(),
        }
    }

    #[instrument(skip(self), fields(route = ?self.navigator.current()))]
    pub async fn execute(&mut self, command: ShellCommand) -> Reply {
        match command {
            ShellCommand::More => {
                if !self.on_catalog("more") {
                    return only_on("more", "the catalog");
                }
                match self.browser.load_more(&self.client).await {
                    LoadOutcome::Skipped if !self.browser.has_more() => {
                        Reply::Notice("All entries are already loaded.".to_string())
                    },
                    _ => Reply::Screen,
                }
            },
            ShellCommand::Filter(text) => {
                if !self.on_catalog("filter") {
                    return only_on("filter", "the catalog");
                }
                self.browser.apply_filter(text);
                Reply::Screen
            },
            ShellCommand::Open(target) => self.open(target).await,
            ShellCommand::Search(term) => match lookup_entry(&self.client, &term).await {
                Ok(Some(entry)) => {
                    self.enter(Route::Details(EntryKey::Id(entry.id))).await;
                    Reply::Screen
                },
                Ok(None) => Reply::Screen,
                Err(err) => Reply::Failed(err),
            },
            ShellCommand::ToggleFavorite => {
                if !matches!(self.navigator.current(), Route::Details(_)) {
                    return only_on("fav", "a details screen");
                }
                let Some(entry) = self.details.entry() else {
                    return Reply::Notice("Nothing to add to favorites yet.".to_string());
                };
                let name = entry.name.clone();
                match self.details.toggle_favorite() {
                    Some(true) => Reply::Notice(format!("Added {name} to favorites.")),
                    Some(false) => Reply::Notice(format!("Removed {name} from favorites.")),
                    None => Reply::Screen,
                }
            },
            ShellCommand::Favorites => {
                if self.navigator.current() != &Route::Favorites {
                    self.enter(Route::Favorites).await;
                }
                Reply::Screen
            },
            ShellCommand::Back => {
                if !self.navigator.back() {
                    return Reply::Notice("Already at the catalog.".to_string());
                }
                self.activate_current().await;
                Reply::Screen
            },
            ShellCommand::Retry => self.retry().await,
            ShellCommand::Help => Reply::Help,
            ShellCommand::Quit => Reply::Quit,
        }
    }

    fn on_catalog(&self, command: &str) -> bool {
        let on_catalog = self.navigator.current() == &Route::Catalog;
        if !on_catalog {
            debug!(command, "command not available on this screen");
        }
        on_catalog
    }

    async fn open(&mut self, target: OpenTarget) -> Reply {
        let key = match (&target, self.navigator.current()) {
            (OpenTarget::Key(key), Route::Catalog | Route::Favorites) => key.clone(),
            (OpenTarget::Position(position), Route::Catalog) => {
                let view = self.browser.view();
                let Some(summary) = view.get(position.get() - 1) else {
                    return no_item(position.get());
                };
                EntryKey::name(&summary.name)
            },
            (OpenTarget::Position(position), Route::Favorites) => {
                let favorites = self.favorites.list();
                let Some(favorite) = favorites.get(position.get() - 1) else {
                    return no_item(position.get());
                };
                EntryKey::Id(favorite.id)
            },
            (_, Route::Details(_)) => return only_on("open", "the catalog or favorites"),
        };

        self.enter(Route::Details(key)).await;
        Reply::Screen
    }

    async fn retry(&mut self) -> Reply {
        match self.navigator.current() {
            Route::Catalog if self.browser.last_error().is_some() => {
                self.browser.retry(&self.client).await;
                Reply::Screen
            },
            Route::Details(_) if self.details.entry().is_none() => {
                self.details.retry(&self.client).await;
                Reply::Screen
            },
            _ => Reply::Notice("Nothing to retry.".to_string()),
        }
    }

    /// Push `route` and activate it.
    async fn enter(&mut self, route: Route) {
        self.navigator.navigate(route);
        self.activate_current().await;
    }

    /// Bring the model of the current route up to date.
    ///
    /// Details are fetched again on every activation,
    /// leaving a details route deactivates its controller.
    async fn activate_current(&mut self) {
        match self.navigator.current().clone() {
            Route::Details(key) => {
                self.details.load(&self.client, key).await;
            },
            Route::Catalog | Route::Favorites => self.details.deactivate(),
        }
    }
}

fn only_on(command: &str, screen: &str) -> Reply {
    Reply::Notice(format!("'{command}' is only available on {screen}."))
}

fn no_item(position: usize) -> Reply {
    Reply::Notice(format!("There is no entry {position} on this screen."))
}

#[cfg(test)]
mod tests {
    use pokedex_catalog::test_helpers::{bulbasaur, page, pikachu, summary};
    use pokedex_catalog::{MockClient, MockRequest, SummaryPage};
    use pretty_assertions::assert_eq;

    use super::*;

    async fn session(client: &MockClient) -> Session<MockClient> {
        client.push_page_response(SummaryPage {
            results: vec![summary("bulbasaur", 1), summary("pikachu", 25)],
            count: 1302,
        });
        let mut session = Session::new(client.clone(), NonZeroU32::new(20).unwrap());
        session.start().await;
        session
    }

    async fn run(session: &mut Session<MockClient>, line: &str) -> Reply {
        session.execute(line.parse().unwrap()).await
    }

    #[tokio::test]
    async fn starts_on_catalog_with_first_page() {
        let client = MockClient::default();
        let session = session(&client).await;

        assert_eq!(session.route(), &Route::Catalog);
        assert_eq!(session.browser().fetched().len(), 2);
        assert!(session.render().contains("pikachu"));
    }

    #[tokio::test]
    async fn open_from_catalog_passes_the_name() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_entry_response(pikachu());

        assert_eq!(run(&mut session, "filter 25").await, Reply::Screen);
        assert_eq!(run(&mut session, "open 1").await, Reply::Screen);

        assert_eq!(
            session.route(),
            &Route::Details(EntryKey::name("pikachu"))
        );
        assert_eq!(
            client.requests().last(),
            Some(&MockRequest::GetByKey(EntryKey::name("pikachu")))
        );
        assert!(session.render().contains("#025"));
    }

    #[tokio::test]
    async fn favorite_round_trip_through_screens() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_entry_response(pikachu());
        client.push_entry_response(pikachu());

        run(&mut session, "open pikachu").await;
        assert_eq!(
            run(&mut session, "fav").await,
            Reply::Notice("Added pikachu to favorites.".to_string())
        );

        run(&mut session, "favorites").await;
        assert_eq!(session.route(), &Route::Favorites);
        assert!(session.render().contains("pikachu"));

        // favorites pass the id
        run(&mut session, "open 1").await;
        assert_eq!(session.route(), &Route::Details(EntryKey::Id(25)));
        assert_eq!(
            run(&mut session, "fav").await,
            Reply::Notice("Removed pikachu from favorites.".to_string())
        );

        run(&mut session, "back").await;
        assert!(session.favorites().is_empty());
        assert!(session.render().contains("No favorites yet"));
    }

    #[tokio::test]
    async fn search_navigates_by_id() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_entry_response(bulbasaur());
        client.push_entry_response(bulbasaur());

        assert_eq!(run(&mut session, "search Bulbasaur").await, Reply::Screen);
        assert_eq!(session.route(), &Route::Details(EntryKey::Id(1)));
        assert_eq!(client.requests()[1..].to_vec(), vec![
            MockRequest::GetByKey(EntryKey::name("bulbasaur")),
            MockRequest::GetByKey(EntryKey::Id(1)),
        ]);
    }

    #[tokio::test]
    async fn search_not_found_stays_put() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_error_response(404);

        assert_eq!(
            run(&mut session, "search no-such-name").await,
            Reply::Failed(ScreenError::NotFound)
        );
        assert_eq!(session.route(), &Route::Catalog);
    }

    #[tokio::test]
    async fn unknown_entry_shows_not_found_and_keeps_favorites() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_error_response(404);

        run(&mut session, "open no-such-name").await;
        assert!(
            session
                .render()
                .contains("Entry not found. Check the name or number.")
        );
        assert_eq!(
            run(&mut session, "fav").await,
            Reply::Notice("Nothing to add to favorites yet.".to_string())
        );
        assert!(session.favorites().is_empty());
    }

    #[tokio::test]
    async fn back_deactivates_details() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_entry_response(pikachu());

        run(&mut session, "open 2").await;
        assert!(session.details().entry().is_some());

        assert_eq!(run(&mut session, "back").await, Reply::Screen);
        assert_eq!(session.route(), &Route::Catalog);
        assert_eq!(session.details().entry(), None);
        assert_eq!(
            run(&mut session, "back").await,
            Reply::Notice("Already at the catalog.".to_string())
        );
    }

    #[tokio::test]
    async fn more_and_retry_on_catalog() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_error_response(500);
        client.push_page_response(page(26..46, 1302));

        run(&mut session, "more").await;
        assert_eq!(
            session.browser().last_error(),
            Some(ScreenError::ListUnavailable)
        );
        assert!(session.render().contains("Could not load the list."));

        run(&mut session, "retry").await;
        assert_eq!(session.browser().last_error(), None);
        assert_eq!(session.browser().fetched().len(), 22);

        let offsets = client
            .requests()
            .into_iter()
            .filter_map(|request| match request {
                MockRequest::ListPage { offset, .. } => Some(offset),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 20, 20]);
    }

    #[tokio::test]
    async fn retry_failed_details() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        client.push_error_response(503);
        client.push_entry_response(pikachu());

        run(&mut session, "open pikachu").await;
        assert!(session.render().contains("Could not load the details."));

        run(&mut session, "retry").await;
        assert_eq!(session.details().entry(), Some(&pikachu()));
        assert_eq!(
            run(&mut session, "retry").await,
            Reply::Notice("Nothing to retry.".to_string())
        );
    }

    #[tokio::test]
    async fn catalog_commands_elsewhere_are_refused() {
        let client = MockClient::default();
        let mut session = session(&client).await;
        run(&mut session, "favs").await;

        assert_eq!(
            run(&mut session, "more").await,
            Reply::Notice("'more' is only available on the catalog.".to_string())
        );
        assert_eq!(
            run(&mut session, "open 3").await,
            Reply::Notice("There is no entry 3 on this screen.".to_string())
        );
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn more_when_complete() {
        let client = MockClient::default();
        client.push_page_response(page(1..3, 2));
        let mut session = Session::new(client.clone(), NonZeroU32::new(20).unwrap());
        session.start().await;

        assert_eq!(
            run(&mut session, "more").await,
            Reply::Notice("All entries are already loaded.".to_string())
        );
        assert_eq!(client.requests().len(), 1);
    }
}
