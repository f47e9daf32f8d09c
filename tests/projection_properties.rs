use proptest::prelude::*;
use reel_search::core::projection::{apply_filters, apply_sort, paginate, project, total_pages};
use reel_search::types::{FilterConfig, MovieSummary, MovieType, PaginationCursor, SortKey, ViewMode};

fn kind_strategy() -> impl Strategy<Value = MovieType> {
    prop_oneof![
        Just(MovieType::Movie),
        Just(MovieType::Series),
        Just(MovieType::Episode),
        Just(MovieType::Game),
    ]
}

fn year_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (1950u32..2030).prop_map(|y| y.to_string()),
        (1950u32..2020, 1u32..10).prop_map(|(y, n)| format!("{}–{}", y, y + n)),
        Just("N/A".to_string()),
    ]
}

fn movies_strategy() -> impl Strategy<Value = Vec<MovieSummary>> {
    proptest::collection::vec(("[A-Za-z ]{1,12}", year_strategy(), kind_strategy()), 0..60).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (title, year, kind))| MovieSummary {
                    id: format!("tt{:07}", i),
                    title,
                    year,
                    kind,
                    poster: None,
                })
                .collect()
        },
    )
}

fn filter_strategy() -> impl Strategy<Value = FilterConfig> {
    (
        prop_oneof![Just(String::new()), "19[5-9]", "20[0-2][0-9]"],
        proptest::option::of(kind_strategy()),
    )
        .prop_map(|(year, kind)| FilterConfig { year, kind })
}

fn sort_strategy() -> impl Strategy<Value = SortKey> {
    proptest::sample::select(SortKey::ALL.to_vec())
}

fn ids(items: &[&MovieSummary]) -> Vec<String> {
    items.iter().map(|m| m.id.clone()).collect()
}

proptest! {
    #[test]
    fn projection_is_deterministic(movies in movies_strategy(), filter in filter_strategy(), sort in sort_strategy()) {
        let first = project(ViewMode::Search, &movies, &[], &filter, sort);
        let second = project(ViewMode::Search, &movies, &[], &filter, sort);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn filtering_is_idempotent(movies in movies_strategy(), filter in filter_strategy()) {
        let once = apply_filters(&movies, &filter);
        let twice = apply_filters(once.iter().copied(), &filter);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_order_does_not_matter(movies in movies_strategy(), filter in filter_strategy()) {
        let year_only = FilterConfig { year: filter.year.clone(), kind: None };
        let kind_only = FilterConfig { year: String::new(), kind: filter.kind };

        let year_first = apply_filters(apply_filters(&movies, &year_only), &kind_only);
        let kind_first = apply_filters(apply_filters(&movies, &kind_only), &year_only);
        prop_assert_eq!(ids(&year_first), ids(&kind_first));
        prop_assert_eq!(ids(&year_first), ids(&apply_filters(&movies, &filter)));
    }

    #[test]
    fn sorting_permutes_and_keeps_ties_in_input_order(movies in movies_strategy(), sort in sort_strategy()) {
        let refs: Vec<&MovieSummary> = movies.iter().collect();
        let sorted = apply_sort(&refs, sort);

        let mut before = ids(&refs);
        let mut after = ids(&sorted);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);

        // ids are generated in input order, so equal keys must keep ascending ids
        let same_key = |a: &MovieSummary, b: &MovieSummary| match sort {
            SortKey::Relevance => true,
            SortKey::YearAsc | SortKey::YearDesc => {
                reel_search::core::projection::year_key(&a.year)
                    == reel_search::core::projection::year_key(&b.year)
            }
            SortKey::TitleAsc | SortKey::TitleDesc => a.title == b.title,
        };
        for pair in sorted.windows(2) {
            if same_key(pair[0], pair[1]) {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    #[test]
    fn pages_cover_the_collection_exactly(movies in movies_strategy(), page_size in 1usize..15) {
        let pages = total_pages(movies.len(), page_size);
        let mut rebuilt = Vec::new();
        for current_page in 1..=pages {
            let page = paginate(&movies, PaginationCursor { current_page, page_size });
            prop_assert!(!page.items.is_empty());
            rebuilt.extend(page.items.iter().cloned());
        }
        prop_assert_eq!(rebuilt, movies.clone());

        let past_end = paginate(&movies, PaginationCursor { current_page: pages + 1, page_size });
        prop_assert!(past_end.items.is_empty());
    }
}

fn scenario_base() -> Vec<MovieSummary> {
    vec![
        MovieSummary {
            id: "tt1".into(),
            title: "Beta".into(),
            year: "2010".into(),
            kind: MovieType::Movie,
            poster: None,
        },
        MovieSummary {
            id: "tt2".into(),
            title: "Alpha".into(),
            year: "2005".into(),
            kind: MovieType::Movie,
            poster: None,
        },
    ]
}

#[test]
fn title_ascending_scenario() {
    let base = scenario_base();
    let visible = project(ViewMode::Search, &base, &[], &FilterConfig::default(), SortKey::TitleAsc);
    assert_eq!(ids(&visible), ["tt2", "tt1"]);
}

#[test]
fn year_descending_scenario() {
    let base = scenario_base();
    let visible = project(ViewMode::Search, &base, &[], &FilterConfig::default(), SortKey::YearDesc);
    assert_eq!(ids(&visible), ["tt1", "tt2"]);
}

#[test]
fn series_filter_over_movies_scenario() {
    let base = scenario_base();
    let filter = FilterConfig { year: String::new(), kind: Some(MovieType::Series) };
    assert!(project(ViewMode::Search, &base, &[], &filter, SortKey::Relevance).is_empty());
}

#[test]
fn third_page_of_twenty_five_scenario() {
    let items: Vec<usize> = (0..25).collect();
    let page = paginate(&items, PaginationCursor::at(3));
    assert_eq!(page.items, &items[20..25]);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn page_beyond_range_scenario() {
    let items: Vec<usize> = (0..12).collect();
    let page = paginate(&items, PaginationCursor::at(5));
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 2);
}
