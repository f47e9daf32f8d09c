//! Text rendering for terminal views

use chrono::{Datelike, Utc};
use colored::Colorize;

use crate::core::session::VisiblePage;
use crate::types::{FilterConfig, MovieDetail, MovieSummary, NOT_AVAILABLE, SortKey, ViewMode};

/// How many years the year filter offers
pub const YEAR_CHOICES: usize = 50;

/// One line per movie in the result list
pub fn format_movie_label(movie: &MovieSummary, favorite: bool) -> String {
    let marker = if favorite { "♥".red() } else { " ".normal() };
    format!(
        "{} {} {} {}",
        marker,
        movie.title,
        format!("({})", movie.year).dimmed(),
        movie.kind.as_str().cyan()
    )
}

/// Header above the result list
pub fn result_header(mode: ViewMode, query: &str, count: u64) -> String {
    let plural = if count == 1 { "" } else { "s" };
    match mode {
        ViewMode::Favorites => format!("Showing {} favorite{}", count, plural),
        ViewMode::Search => format!("Found {} result{} for \"{}\"", count, plural, query),
    }
}

/// Compact summary of sort, filters and page position
pub fn status_line(page: &VisiblePage<'_>, filter: &FilterConfig, sort: SortKey) -> String {
    let mut parts = vec![format!(
        "Page {}/{}",
        page.current_page,
        page.total_pages.max(1)
    )];
    parts.push(format!("Sort: {}", sort.label()));
    if let Some(kind) = filter.kind {
        parts.push(format!("Type: {}", kind.label()));
    }
    if !filter.year.is_empty() {
        parts.push(format!("Year: {}", filter.year));
    }
    parts.join("  |  ")
}

/// Message for an empty view. `has_base` tells whether the mode's
/// collection has anything before filtering.
pub fn empty_message(mode: ViewMode, query: &str, has_base: bool) -> String {
    match mode {
        ViewMode::Favorites if !has_base => {
            "No favorites yet. Start adding movies to your favorites!".into()
        }
        ViewMode::Favorites => "No favorites match the current filters.".into(),
        ViewMode::Search if query.is_empty() => {
            "Search for your favorite movies to get started".into()
        }
        ViewMode::Search if has_base => "No results match the current filters.".into(),
        ViewMode::Search => format!(
            "No movies found for \"{}\". Try a different search term.",
            query
        ),
    }
}

/// Years offered by the year filter, newest first
pub fn year_choices(current_year: i32) -> Vec<String> {
    (0..YEAR_CHOICES as i32)
        .map(|offset| (current_year - offset).to_string())
        .collect()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

fn field(label: &str, value: &str) -> String {
    format!("{:<12}{}", format!("{}:", label).bold(), value)
}

/// Full detail view
pub fn render_details(detail: &MovieDetail, favorite: bool) -> String {
    let summary = &detail.summary;
    let mut lines = vec![
        format!(
            "{} {}",
            summary.title.bold().underline(),
            if favorite { "♥".red().to_string() } else { String::new() }
        ),
        format!("{} · {}", summary.year, summary.kind.as_str()).dimmed().to_string(),
        String::new(),
        detail.plot.clone(),
        String::new(),
        field("Director", &detail.director),
        field("Writer", &detail.writer),
        field("Cast", &detail.actors),
        field("Released", &detail.released),
        field("Runtime", &detail.runtime),
        field("Genre", &detail.genre),
        field("Language", &detail.language),
        field("Country", &detail.country),
        field("Awards", &detail.awards),
        field("Box Office", detail.box_office.as_deref().unwrap_or(NOT_AVAILABLE)),
        field("Poster", summary.poster.as_deref().unwrap_or(NOT_AVAILABLE)),
    ];

    if !detail.ratings.is_empty() {
        lines.push(String::new());
        lines.push("Ratings".bold().to_string());
        for rating in &detail.ratings {
            lines.push(format!("  {:<28}{}", rating.source, rating.value.bold()));
        }
    }

    lines.join("\n")
}
