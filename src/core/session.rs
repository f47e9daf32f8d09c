//! Session state: the single owner of everything the views render
//!
//! Network calls are split into `begin_*` and `finish_*` so each response is
//! matched against the generation that requested it. A response for a query
//! that has since been superseded is dropped instead of overwriting newer
//! state.

use tracing::{debug, info};

use crate::core::omdb::MovieSource;
use crate::core::projection::{paginate, project};
use crate::error::{ReelError, Result};
use crate::storage::favorites::Favorites;
use crate::storage::kv::KeyValueStore;
use crate::types::{
    FilterConfig, MovieDetail, MovieSummary, MovieType, PaginationCursor, SearchResults, SortKey,
    ViewMode,
};

/// Handle for an issued search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

/// Handle for an issued details fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsTicket {
    generation: u64,
    pub id: String,
}

/// What the result view shows right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePage<'a> {
    pub movies: Vec<&'a MovieSummary>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Size of the whole projection
    pub matched: usize,
}

impl VisiblePage<'_> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub struct Session<S> {
    favorites: Favorites<S>,
    search_results: Vec<MovieSummary>,
    total_results: u64,
    query: String,
    filter: FilterConfig,
    sort: SortKey,
    view_mode: ViewMode,
    cursor: PaginationCursor,
    error: Option<String>,
    selected: Option<MovieDetail>,
    search_generation: u64,
    details_generation: u64,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(favorites: Favorites<S>) -> Self {
        Self {
            favorites,
            search_results: Vec::new(),
            total_results: 0,
            query: String::new(),
            filter: FilterConfig::default(),
            sort: SortKey::default(),
            view_mode: ViewMode::default(),
            cursor: PaginationCursor::default(),
            error: None,
            selected: None,
            search_generation: 0,
            details_generation: 0,
        }
    }

    // ----- search -----

    /// Start a search for `query`.
    ///
    /// Blank queries are refused with [`ReelError::EmptyQuery`] and leave the
    /// session untouched.
    pub fn begin_search(&mut self, query: &str) -> Result<SearchTicket> {
        if query.trim().is_empty() {
            return Err(ReelError::EmptyQuery);
        }

        self.search_generation += 1;
        self.query = query.to_string();
        self.error = None;
        self.view_mode = ViewMode::Search;
        self.reset_page();

        Ok(SearchTicket {
            generation: self.search_generation,
            query: self.query.clone(),
        })
    }

    /// Apply a search outcome. Returns false when the ticket is stale and the
    /// outcome was dropped.
    pub fn finish_search(&mut self, ticket: &SearchTicket, outcome: Result<SearchResults>) -> bool {
        if ticket.generation != self.search_generation {
            info!(query = %ticket.query, latest = %self.query, "discarding stale search response");
            return false;
        }

        match outcome {
            Ok(results) => {
                debug!(query = %ticket.query, count = results.movies.len(), "search applied");
                self.search_results = results.movies;
                self.total_results = results.total_results;
            }
            Err(e) => {
                self.search_results.clear();
                self.total_results = 0;
                self.error = Some(e.to_string());
            }
        }
        self.reset_page();
        true
    }

    /// Issue a search against `source` and apply the outcome
    pub async fn search<M>(&mut self, source: &M, query: &str) -> Result<()>
    where
        M: MovieSource + ?Sized,
    {
        let ticket = self.begin_search(query)?;
        let outcome = source.search_by_title(&ticket.query).await;
        self.finish_search(&ticket, outcome);
        Ok(())
    }

    // ----- details -----

    pub fn begin_details(&mut self, id: &str) -> DetailsTicket {
        self.details_generation += 1;
        self.error = None;
        DetailsTicket {
            generation: self.details_generation,
            id: id.to_string(),
        }
    }

    /// Apply a details outcome. Failures only set the error message.
    pub fn finish_details(&mut self, ticket: &DetailsTicket, outcome: Result<MovieDetail>) -> bool {
        if ticket.generation != self.details_generation {
            info!(id = %ticket.id, "discarding stale details response");
            return false;
        }

        match outcome {
            Ok(detail) => self.selected = Some(detail),
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Fetch and select the detail record for `id`
    pub async fn show_details<M>(&mut self, source: &M, id: &str)
    where
        M: MovieSource + ?Sized,
    {
        let ticket = self.begin_details(id);
        let outcome = source.fetch_details(&ticket.id).await;
        self.finish_details(&ticket, outcome);
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    // ----- favorites -----

    /// Toggle `movie` in the favorites set; returns whether it is now a favorite
    pub async fn toggle_favorite(&mut self, movie: &MovieSummary) -> Result<bool> {
        let now_favorite = self.favorites.toggle(movie).await?;
        if self.view_mode == ViewMode::Favorites {
            self.reset_page();
        }
        Ok(now_favorite)
    }

    /// Pick up favorites written by another running instance
    pub async fn reload_favorites(&mut self) -> bool {
        let changed = self.favorites.reload().await;
        if changed && self.view_mode == ViewMode::Favorites {
            self.reset_page();
        }
        changed
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites(&self) -> &Favorites<S> {
        &self.favorites
    }

    // ----- projection inputs -----

    pub fn set_filter(&mut self, filter: FilterConfig) {
        if self.filter != filter {
            self.filter = filter;
            self.reset_page();
        }
    }

    pub fn set_year_filter(&mut self, year: impl Into<String>) {
        let filter = FilterConfig {
            year: year.into(),
            ..self.filter.clone()
        };
        self.set_filter(filter);
    }

    pub fn set_type_filter(&mut self, kind: Option<MovieType>) {
        let filter = FilterConfig {
            kind,
            ..self.filter.clone()
        };
        self.set_filter(filter);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.reset_page();
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.reset_page();
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.set_view_mode(self.view_mode.toggled());
    }

    // ----- pagination -----

    /// Jump to `page` (1-based). Not clamped: a page past the end shows empty.
    pub fn set_page(&mut self, page: usize) {
        self.cursor.current_page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.cursor.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.cursor.current_page.saturating_sub(1));
    }

    fn reset_page(&mut self) {
        self.cursor.current_page = 1;
    }

    // ----- derived views -----

    /// Filtered and sorted movies for the current view mode
    pub fn projection(&self) -> Vec<&MovieSummary> {
        project(
            self.view_mode,
            &self.search_results,
            self.favorites.all(),
            &self.filter,
            self.sort,
        )
    }

    /// The page under the cursor
    pub fn visible_page(&self) -> VisiblePage<'_> {
        let projection = self.projection();
        let page = paginate(&projection, self.cursor);
        VisiblePage {
            movies: page.items.to_vec(),
            current_page: page.current_page,
            total_pages: page.total_pages,
            matched: projection.len(),
        }
    }

    /// Count for the result header: the API's total while searching, the
    /// projected count for favorites
    pub fn result_count(&self) -> u64 {
        match self.view_mode {
            ViewMode::Search => self.total_results,
            ViewMode::Favorites => self.projection().len() as u64,
        }
    }

    /// Find a movie by id in either collection
    pub fn find(&self, id: &str) -> Option<&MovieSummary> {
        self.search_results
            .iter()
            .chain(self.favorites.all())
            .find(|m| m.id == id)
    }

    pub fn search_results(&self) -> &[MovieSummary] {
        &self.search_results
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn current_page(&self) -> usize {
        self.cursor.current_page
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&MovieDetail> {
        self.selected.as_ref()
    }
}
