//! Results projection: source selection, filtering, sorting, pagination
//!
//! Every stage is a pure function over borrowed movies. Nothing here
//! allocates a `MovieSummary`; stages pass `&MovieSummary` along so the
//! visible page always points back into the session's collections.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::types::{FilterConfig, MovieSummary, Page, PaginationCursor, SortKey, ViewMode};

/// Leading integer of a year field, the way an integer parse reads "2010–2015"
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("Invalid regex"));

/// Choose the collection that feeds the pipeline
pub fn select_base<'a>(
    mode: ViewMode,
    search_results: &'a [MovieSummary],
    favorites: &'a [MovieSummary],
) -> &'a [MovieSummary] {
    match mode {
        ViewMode::Search => search_results,
        ViewMode::Favorites => favorites,
    }
}

/// Whether a single movie passes every active filter
pub fn passes(movie: &MovieSummary, filter: &FilterConfig) -> bool {
    // Literal substring: "2012" does not match "2010–2015"
    let year_ok = filter.year.is_empty() || movie.year.contains(filter.year.as_str());
    let kind_ok = filter.kind.is_none_or(|kind| movie.kind == kind);
    year_ok && kind_ok
}

/// Keep the movies that pass `filter`, in input order
pub fn apply_filters<'a, I>(items: I, filter: &FilterConfig) -> Vec<&'a MovieSummary>
where
    I: IntoIterator<Item = &'a MovieSummary>,
{
    items.into_iter().filter(|m| passes(m, filter)).collect()
}

/// Numeric year used for ordering. `None` sorts below every valid year.
pub fn year_key(year: &str) -> Option<i64> {
    LEADING_INT
        .captures(year)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Title order that ignores case and accents, so "Éclair" files under E.
///
/// Ties fall back to accented letters after their base letter, then
/// lowercase before uppercase, then raw code points.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let base = |s: &str| {
        s.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect::<Vec<_>>()
    };
    let folded = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let case_rank = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    base(a)
        .cmp(&base(b))
        .then_with(|| folded(a).cmp(&folded(b)))
        .then_with(|| case_rank(a).cmp(&case_rank(b)))
        .then_with(|| a.cmp(b))
}

/// Order movies by `key`.
///
/// `Relevance` hands the input back untouched. Other keys produce a new
/// stably sorted sequence, so ties keep their relevance order.
pub fn apply_sort<'b, 'a>(
    items: &'b [&'a MovieSummary],
    key: SortKey,
) -> Cow<'b, [&'a MovieSummary]> {
    let compare: fn(&MovieSummary, &MovieSummary) -> Ordering = match key {
        SortKey::Relevance => return Cow::Borrowed(items),
        SortKey::YearDesc => |a, b| year_key(&b.year).cmp(&year_key(&a.year)),
        SortKey::YearAsc => |a, b| year_key(&a.year).cmp(&year_key(&b.year)),
        SortKey::TitleAsc => |a, b| compare_titles(&a.title, &b.title),
        SortKey::TitleDesc => |a, b| compare_titles(&b.title, &a.title),
    };

    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare(a, b));
    Cow::Owned(sorted)
}

/// Number of pages needed for `len` items
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Slice out the page under `cursor`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], cursor: PaginationCursor) -> Page<'_, T> {
    let current_page = cursor.current_page.max(1);
    let start = (current_page - 1).saturating_mul(cursor.page_size);
    let end = start.saturating_add(cursor.page_size).min(items.len());

    Page {
        items: items.get(start..end).unwrap_or(&[]),
        current_page,
        total_pages: total_pages(items.len(), cursor.page_size),
    }
}

/// Source selection, filter and sort in one pass
pub fn project<'a>(
    mode: ViewMode,
    search_results: &'a [MovieSummary],
    favorites: &'a [MovieSummary],
    filter: &FilterConfig,
    sort: SortKey,
) -> Vec<&'a MovieSummary> {
    let base = select_base(mode, search_results, favorites);
    let filtered = apply_filters(base, filter);
    if sort == SortKey::Relevance {
        return filtered;
    }
    apply_sort(&filtered, sort).into_owned()
}
