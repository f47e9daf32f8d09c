use async_trait::async_trait;
use proptest::prelude::*;
use reel_search::core::omdb::MovieSource;
use reel_search::core::session::Session;
use reel_search::error::{ReelError, Result};
use reel_search::storage::favorites::{FAVORITES_KEY, Favorites};
use reel_search::storage::kv::{FileStore, KeyValueStore, MemoryStore};
use reel_search::types::{MovieDetail, MovieSummary, MovieType, SearchResults, ViewMode};
use std::sync::atomic::{AtomicUsize, Ordering};

fn movie(id: &str) -> MovieSummary {
    MovieSummary {
        id: id.into(),
        title: format!("Title {}", id),
        year: "1999".into(),
        kind: MovieType::Movie,
        poster: None,
    }
}

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl MovieSource for CountingSource {
    async fn search_by_title(&self, _query: &str) -> Result<SearchResults> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SearchResults {
            movies: vec![movie("tt1"), movie("tt2")],
            total_results: 2,
        })
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetail> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ReelError::Fetch(format!("no details for {}", id)))
    }
}

#[tokio::test]
async fn empty_query_scenario() {
    let source = CountingSource::default();
    let mut session = Session::new(Favorites::open(MemoryStore::new()).await);

    let err = session.search(&source, "").await.unwrap_err();
    assert!(matches!(err, ReelError::EmptyQuery));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert!(session.search_results().is_empty());
}

#[tokio::test]
async fn favorites_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let source = CountingSource::default();

    {
        let mut session = Session::new(Favorites::open(FileStore::new(&path)).await);
        session.search(&source, "title").await.unwrap();
        let first = session.search_results()[0].clone();
        session.toggle_favorite(&first).await.unwrap();
    }

    let mut session = Session::new(Favorites::open(FileStore::new(&path)).await);
    session.set_view_mode(ViewMode::Favorites);
    let visible: Vec<&str> = session
        .visible_page()
        .movies
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(visible, ["tt1"]);
}

#[tokio::test]
async fn corrupt_store_starts_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "garbage").unwrap();

    let mut favorites = Favorites::open(FileStore::new(&path)).await;
    assert!(favorites.is_empty());

    favorites.toggle(&movie("tt7")).await.unwrap();
    let stored = favorites.store().get(FAVORITES_KEY).await.unwrap();
    assert!(stored.is_some_and(|s| s.contains("tt7")));
}

#[tokio::test]
async fn second_instance_sees_changes_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut first = Favorites::open(FileStore::new(&path)).await;
    let mut second = Favorites::open(FileStore::new(&path)).await;

    first.toggle(&movie("tt1")).await.unwrap();
    assert!(!second.contains("tt1"));
    assert!(second.reload().await);
    assert!(second.contains("tt1"));
}

#[tokio::test]
async fn interleaved_instances_keep_each_others_favorites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut first = Favorites::open(FileStore::new(&path)).await;
    let mut second = Favorites::open(FileStore::new(&path)).await;

    second.toggle(&movie("tt_b")).await.unwrap();
    first.toggle(&movie("tt_a")).await.unwrap();
    assert!(first.contains("tt_b"));

    let reopened = Favorites::open(FileStore::new(&path)).await;
    let ids: Vec<&str> = reopened.all().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["tt_b", "tt_a"]);

    first.clear().await.unwrap();
    second.toggle(&movie("tt_c")).await.unwrap();
    let reopened = Favorites::open(FileStore::new(&path)).await;
    let ids: Vec<&str> = reopened.all().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["tt_c"]);
}

fn toggles() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..6, 0..40)
}

proptest! {
    #[test]
    fn toggling_never_duplicates_ids(sequence in toggles()) {
        let ids: Vec<String> = tokio_test::block_on(async {
            let mut favorites = Favorites::open(MemoryStore::new()).await;
            for n in &sequence {
                favorites.toggle(&movie(&format!("tt{}", n))).await.unwrap();
            }
            favorites.all().iter().map(|m| m.id.clone()).collect()
        });

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn add_then_remove_restores_membership(existing in proptest::collection::btree_set(0u8..20, 0..10), extra in 20u8..40) {
        let (before, after) = tokio_test::block_on(async {
            let mut favorites = Favorites::open(MemoryStore::new()).await;
            for n in &existing {
                favorites.toggle(&movie(&format!("tt{}", n))).await.unwrap();
            }
            let snapshot = |f: &Favorites<MemoryStore>| {
                let mut ids: Vec<String> = f.all().iter().map(|m| m.id.clone()).collect();
                ids.sort();
                ids
            };
            let before = snapshot(&favorites);

            let newcomer = movie(&format!("tt{}", extra));
            favorites.toggle(&newcomer).await.unwrap();
            favorites.toggle(&newcomer).await.unwrap();
            (before, snapshot(&favorites))
        });

        prop_assert_eq!(before, after);
    }
}
