//! Type definitions for reel-search
//!
//! Source of truth for all data structures. Entity types deserialize
//! straight from OMDb's field names, so a response that parses is already
//! validated and the persisted favorites keep the same shape.

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of movies per page
pub const PAGE_SIZE: usize = 10;

/// Marker OMDb uses for a missing value
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================
// Movie Types
// ============================================

/// Kind of title as reported by OMDb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MovieType {
    Movie,
    Series,
    Episode,
    Game,
}

impl MovieType {
    pub const ALL: [MovieType; 4] = [Self::Movie, Self::Series, Self::Episode, Self::Game];

    /// Wire value, e.g. "series"
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "Movies",
            Self::Series => "TV Series",
            Self::Episode => "Episodes",
            Self::Game => "Games",
        }
    }
}

impl fmt::Display for MovieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Free text: "2010", "2010–2015", "2019–" or "N/A"
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Type")]
    pub kind: MovieType,
    /// `None` when OMDb has no poster
    #[serde(
        rename = "Poster",
        default,
        serialize_with = "serialize_poster",
        deserialize_with = "deserialize_poster"
    )]
    pub poster: Option<String>,
}

fn serialize_poster<S: Serializer>(poster: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(poster.as_deref().unwrap_or(NOT_AVAILABLE))
}

fn deserialize_poster<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|p| !p.is_empty() && p != NOT_AVAILABLE))
}

fn not_available() -> String {
    NOT_AVAILABLE.into()
}

/// One entry of the ratings list, e.g. "Rotten Tomatoes" / "87%"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record for a single title (extends MovieSummary)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Plot", default = "not_available")]
    pub plot: String,
    #[serde(rename = "Director", default = "not_available")]
    pub director: String,
    #[serde(rename = "Writer", default = "not_available")]
    pub writer: String,
    #[serde(rename = "Actors", default = "not_available")]
    pub actors: String,
    #[serde(rename = "Released", default = "not_available")]
    pub released: String,
    #[serde(rename = "Runtime", default = "not_available")]
    pub runtime: String,
    #[serde(rename = "Genre", default = "not_available")]
    pub genre: String,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    #[serde(rename = "Language", default = "not_available")]
    pub language: String,
    #[serde(rename = "Country", default = "not_available")]
    pub country: String,
    #[serde(rename = "Awards", default = "not_available")]
    pub awards: String,
    /// Missing for most series and episodes
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
}

/// A validated search response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Ranked as returned, duplicates removed
    pub movies: Vec<MovieSummary>,
    /// Total hits reported by the API (may exceed `movies.len()`)
    pub total_results: u64,
}

// ============================================
// Projection Types
// ============================================

/// Which collection feeds the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Search,
    Favorites,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Search => Self::Favorites,
            Self::Favorites => Self::Search,
        }
    }
}

/// Active filters, AND-combined
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterConfig {
    /// Literal substring matched against `MovieSummary::year`; empty = any
    pub year: String,
    /// `None` = any type
    pub kind: Option<MovieType>,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.year.is_empty() && self.kind.is_none()
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Order returned by the API
    #[default]
    Relevance,
    YearDesc,
    YearAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Relevance,
        Self::YearDesc,
        Self::YearAsc,
        Self::TitleAsc,
        Self::TitleDesc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::YearDesc => "Year (Newest First)",
            Self::YearAsc => "Year (Oldest First)",
            Self::TitleAsc => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
        }
    }
}

/// 1-based page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl PaginationCursor {
    pub fn at(current_page: usize) -> Self {
        Self {
            current_page: current_page.max(1),
            ..Self::default()
        }
    }
}

/// One page of a projection
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub current_page: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

// ============================================
// Config Types
// ============================================

/// Menu selector type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectorType {
    #[default]
    Fzf,
    Dialoguer,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OMDb API key (overridden by OMDB_API_KEY)
    pub api_key: String,
    /// Sort applied on startup
    pub default_sort: SortKey,
    /// Menu selector
    pub selector: SelectorType,
    /// Editor command (default: "nvim")
    pub editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_sort: SortKey::default(),
            selector: SelectorType::default(),
            editor: "nvim".into(),
        }
    }
}

// ============================================
// Selector Types
// ============================================

/// Item displayed in selector menu
#[derive(Debug, Clone)]
pub struct MenuItem<T> {
    /// Display text
    pub label: String,
    /// Underlying value
    pub value: T,
}

impl<T> MenuItem<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

// ============================================
// State Machine Types
// ============================================

/// Application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial menu selection
    Init,
    /// Prompt for a title and run the search
    Search,
    /// Show the current page and its actions
    Browse,
    /// Show the selected title
    Details,
    /// Exit application
    Exit,
}

/// Actions offered below a page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    Open(String),
    NextPage,
    PreviousPage,
    FilterType,
    FilterYear,
    Sort,
    ClearFilters,
    SwitchView,
    NewSearch,
    Exit,
}
