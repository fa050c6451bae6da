//! Incremental loading of the catalog list.
//!
//! [CatalogBrowser] owns every summary fetched so far, the cursor for the
//! next page, the total reported by the catalog and a client-side filter.
//!
//! Fetches are split in two steps so the busy flag and the stale-result
//! guard work the same no matter who performs the request:
//!
//! 1. `begin_*` checks preconditions, marks the browser busy and hands out a
//!    [PageRequest] for the page to fetch.
//! 2. [CatalogBrowser::finish] applies the result of that request, unless the
//!    request has been superseded or abandoned in the meantime.
//!
//! [CatalogBrowser::load_initial] and [CatalogBrowser::load_more] run both
//! steps against a [ClientTrait].

use std::cell::OnceCell;
use std::num::NonZeroU32;

use pokedex_catalog::{CatalogClientError, CatalogSummary, ClientTrait, SummaryPage};
use tracing::debug;

use super::filter::matching_indices;
use super::{Generation, ScreenError};

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(20).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Replace everything with the first page.
    Initial,
    /// Append the page at the cursor.
    More,
}

/// A page fetch handed out by the browser.
///
/// The request must be passed back to [CatalogBrowser::finish] together with
/// its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: LoadKind,
    pub limit: u32,
    pub offset: u32,
    generation: Generation,
}

/// Coarse state of the browser, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserState {
    /// Nothing fetched or requested yet.
    Idle,
    Loading(LoadKind),
    Loaded {
        /// Every entry of the catalog has been fetched.
        complete: bool,
    },
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Preconditions did not hold, no request was made.
    Skipped,
    Loaded { added: usize },
    Failed(ScreenError),
    /// The result belonged to a superseded request and was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct CatalogBrowser {
    page_size: NonZeroU32,
    fetched: Vec<CatalogSummary>,
    /// Number of summaries requested so far.
    next_offset: u32,
    total_count: Option<u64>,
    /// The request currently in flight, at most one.
    pending: Option<PageRequest>,
    last_error: Option<ScreenError>,
    filter_text: String,
    generation: Generation,
    /// Indices into `fetched` that pass the filter, computed on first use.
    view: OnceCell<Vec<usize>>,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CatalogBrowser {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            page_size,
            fetched: Vec::new(),
            next_offset: 0,
            total_count: None,
            pending: None,
            last_error: None,
            filter_text: String::new(),
            generation: Generation::default(),
            view: OnceCell::new(),
        }
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Every summary fetched so far, in catalog order.
    pub fn fetched(&self) -> &[CatalogSummary] {
        &self.fetched
    }

    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn last_error(&self) -> Option<ScreenError> {
        self.last_error
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the catalog may hold entries that have not been fetched yet.
    pub fn has_more(&self) -> bool {
        self.total_count
            .is_none_or(|total| (self.fetched.len() as u64) < total)
    }

    pub fn state(&self) -> BrowserState {
        if let Some(request) = &self.pending {
            return BrowserState::Loading(request.kind);
        }
        if self.last_error.is_some() {
            return BrowserState::Error;
        }
        if self.fetched.is_empty() && self.total_count.is_none() {
            return BrowserState::Idle;
        }
        BrowserState::Loaded {
            complete: !self.has_more(),
        }
    }

    // region: fetching

    /// Start a reset that loads the first page.
    ///
    /// Returns `None` if another request is in flight.
    pub fn begin_initial(&mut self) -> Option<PageRequest> {
        self.begin(LoadKind::Initial, 0)
    }

    /// Start loading the page at the cursor.
    ///
    /// Returns `None` if another request is in flight,
    /// or once every entry of the catalog has been fetched.
    pub fn begin_more(&mut self) -> Option<PageRequest> {
        if !self.has_more() {
            debug!(
                fetched = self.fetched.len(),
                total_count = self.total_count,
                "all entries fetched, not loading more"
            );
            return None;
        }
        self.begin(LoadKind::More, self.next_offset)
    }

    fn begin(&mut self, kind: LoadKind, offset: u32) -> Option<PageRequest> {
        if let Some(pending) = &self.pending {
            debug!(?pending, ?kind, "request in flight, not starting another");
            return None;
        }

        let request = PageRequest {
            kind,
            limit: self.page_size.get(),
            offset,
            generation: self.generation.advance(),
        };
        debug!(?request, "starting page request");
        self.pending = Some(request.clone());
        Some(request)
    }

    /// Apply the result of `request`.
    ///
    /// Results of requests that are no longer pending are discarded
    /// without touching any state.
    pub fn finish(
        &mut self,
        request: PageRequest,
        result: Result<SummaryPage, CatalogClientError>,
    ) -> LoadOutcome {
        if self.pending.as_ref() != Some(&request) {
            debug!(?request, "discarding result of superseded page request");
            return LoadOutcome::Discarded;
        }
        self.pending = None;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                debug!(?request, error = %err, "failed to load catalog page");
                if request.kind == LoadKind::Initial {
                    self.fetched.clear();
                    self.next_offset = 0;
                    self.total_count = None;
                    self.invalidate_view();
                }
                self.last_error = Some(ScreenError::ListUnavailable);
                return LoadOutcome::Failed(ScreenError::ListUnavailable);
            },
        };

        let added = page.results.len();
        match request.kind {
            LoadKind::Initial => {
                self.fetched = page.results;
                self.total_count = Some(page.count);
            },
            LoadKind::More => {
                self.fetched.extend(page.results);
                if self.total_count.is_none() {
                    self.total_count = Some(page.count);
                }
            },
        }
        self.next_offset = request.offset.saturating_add(request.limit);
        self.last_error = None;
        self.invalidate_view();

        debug!(
            added,
            fetched = self.fetched.len(),
            next_offset = self.next_offset,
            total_count = self.total_count,
            "applied catalog page"
        );
        LoadOutcome::Loaded { added }
    }

    /// Forget the request in flight, its result will be discarded.
    pub fn abandon(&mut self) {
        if let Some(request) = self.pending.take() {
            debug!(?request, "abandoned page request");
        }
        self.generation.advance();
    }

    /// Reset and load the first page.
    pub async fn load_initial(&mut self, client: &impl ClientTrait) -> LoadOutcome {
        let Some(request) = self.begin_initial() else {
            return LoadOutcome::Skipped;
        };
        self.fetch(client, request).await
    }

    /// Load the page at the cursor, if there is one.
    pub async fn load_more(&mut self, client: &impl ClientTrait) -> LoadOutcome {
        let Some(request) = self.begin_more() else {
            return LoadOutcome::Skipped;
        };
        self.fetch(client, request).await
    }

    /// Re-run whatever load makes sense after a failure.
    pub async fn retry(&mut self, client: &impl ClientTrait) -> LoadOutcome {
        if self.fetched.is_empty() {
            self.load_initial(client).await
        } else {
            self.load_more(client).await
        }
    }

    async fn fetch(&mut self, client: &impl ClientTrait, request: PageRequest) -> LoadOutcome {
        let result = client.list_page(request.limit, request.offset).await;
        self.finish(request, result)
    }

    // endregion

    // region: filtering

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Narrow the view to fetched summaries matching `text`.
    ///
    /// Never changes what has been fetched and never triggers a fetch.
    pub fn apply_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.filter_text {
            self.filter_text = text;
            self.invalidate_view();
        }
    }

    /// The fetched summaries that pass the current filter, in catalog order.
    pub fn view(&self) -> Vec<&CatalogSummary> {
        self.view
            .get_or_init(|| matching_indices(&self.fetched, &self.filter_text))
            .iter()
            .map(|&index| &self.fetched[index])
            .collect()
    }

    fn invalidate_view(&mut self) {
        self.view = OnceCell::new();
    }

    // endregion
}
