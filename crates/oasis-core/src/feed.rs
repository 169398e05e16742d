//! Browse feed: the card grid's data.
//!
//! Holds the current filter bar state, the loaded titles and the pagination
//! cursor. Pages are appended as the user scrolls and de-duplicated by ID,
//! since AniList pages can shift while popularity changes. The watchlist
//! view swaps the catalog query for a lookup of the bookmarked IDs.

use std::collections::HashSet;

use oasis_api::{Anime, BrowseQuery, CatalogService, MediaSort};

use crate::error::OasisError;
use crate::watchlist::Watchlist;

const LOAD_FAILED: &str = "Failed to load anime. Please try again later.";

/// A partial filter bar update. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChange {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub sort: Option<MediaSort>,
}

/// What the grid should say under (or instead of) the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing requested yet.
    Idle,
    /// The last request failed.
    Error,
    /// Every page of the current query is loaded.
    EndReached,
    EmptyWatchlist,
    NoResults,
    /// More pages are available.
    Ready,
}

impl FeedStatus {
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Error => Some(LOAD_FAILED),
            Self::EndReached => Some("You've reached the end!"),
            Self::EmptyWatchlist => Some("Your watchlist is empty."),
            Self::NoResults => Some("No anime found. Try a different filter?"),
            Self::Idle | Self::Ready => None,
        }
    }
}

pub struct Feed<C> {
    catalog: C,
    query: BrowseQuery,
    items: Vec<Anime>,
    page: u32,
    has_next_page: bool,
    loaded: bool,
    watchlist_only: bool,
    last_error: Option<String>,
}

impl<C: CatalogService> Feed<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_query(catalog, BrowseQuery::default())
    }

    pub fn with_query(catalog: C, query: BrowseQuery) -> Self {
        Self {
            catalog,
            query,
            items: Vec::new(),
            page: 1,
            has_next_page: true,
            loaded: false,
            watchlist_only: false,
            last_error: None,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn query(&self) -> &BrowseQuery {
        &self.query
    }

    pub fn items(&self) -> &[Anime] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn is_watchlist_only(&self) -> bool {
        self.watchlist_only
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> FeedStatus {
        if self.last_error.is_some() {
            return FeedStatus::Error;
        }
        if !self.loaded {
            return FeedStatus::Idle;
        }
        match (self.items.is_empty(), self.watchlist_only) {
            (true, true) => FeedStatus::EmptyWatchlist,
            (true, false) => FeedStatus::NoResults,
            (false, true) => FeedStatus::Ready,
            (false, false) if self.has_next_page => FeedStatus::Ready,
            (false, false) => FeedStatus::EndReached,
        }
    }

    /// Start over from the first page of the current view.
    pub async fn reload(&mut self, watchlist: &Watchlist) -> Result<(), OasisError> {
        if self.watchlist_only {
            return self.load_watchlist(watchlist.ids()).await;
        }

        tracing::debug!(query = ?self.query, "reloading feed");
        let result = self.catalog.browse(&self.query, 1).await;
        let page = match result {
            Ok(page) => page,
            Err(e) => return Err(self.fail(e)),
        };

        self.items = page.media;
        dedup_by_id(&mut self.items);
        self.page = 1;
        self.has_next_page = page.has_next_page;
        self.loaded = true;
        self.last_error = None;
        Ok(())
    }

    /// Fetch and append the next page. Returns `false` when there is nothing
    /// to load: watchlist view, last page reached, or no first page yet.
    pub async fn load_more(&mut self) -> Result<bool, OasisError> {
        if self.watchlist_only || !self.has_next_page || !self.loaded {
            return Ok(false);
        }

        let next = self.page + 1;
        tracing::debug!(page = next, "loading next page");
        let result = self.catalog.browse(&self.query, next).await;
        let page = match result {
            Ok(page) => page,
            Err(e) => return Err(self.fail(e)),
        };

        self.items.extend(page.media);
        dedup_by_id(&mut self.items);
        self.page = next;
        self.has_next_page = page.has_next_page;
        self.last_error = None;
        Ok(true)
    }

    /// Apply a filter bar change. Always leaves the watchlist view. Returns
    /// whether a reload is needed.
    pub fn apply_filters(&mut self, change: FilterChange) -> bool {
        let mut changed = std::mem::take(&mut self.watchlist_only);

        if let Some(search) = change.search {
            if search != self.query.search {
                self.query.search = search;
                changed = true;
            }
        }
        if let Some(genre) = change.genre {
            if genre != self.query.genre {
                self.query.genre = genre;
                changed = true;
            }
        }
        if let Some(sort) = change.sort {
            if sort != self.query.sort {
                self.query.sort = sort;
                changed = true;
            }
        }
        changed
    }

    /// Switch between the catalog and the watchlist. Clears the grid; the
    /// caller reloads. Returns the new mode.
    pub fn toggle_watchlist_view(&mut self) -> bool {
        self.items.clear();
        self.loaded = false;
        self.last_error = None;
        self.watchlist_only = !self.watchlist_only;
        self.watchlist_only
    }

    async fn load_watchlist(&mut self, ids: &[u64]) -> Result<(), OasisError> {
        if ids.is_empty() {
            self.items.clear();
            self.page = 1;
            self.has_next_page = false;
            self.loaded = true;
            self.last_error = None;
            return Ok(());
        }

        tracing::debug!(count = ids.len(), "loading watchlist");
        let result = self.catalog.by_ids(ids).await;
        let items = match result {
            Ok(items) => items,
            Err(e) => return Err(self.fail(e)),
        };

        self.items = items;
        dedup_by_id(&mut self.items);
        self.page = 1;
        self.has_next_page = false;
        self.loaded = true;
        self.last_error = None;
        Ok(())
    }

    fn fail(&mut self, err: C::Error) -> OasisError {
        tracing::warn!(error = %err, "catalog request failed");
        self.last_error = Some(LOAD_FAILED.to_string());
        OasisError::catalog(err)
    }
}

/// Keep the first occurrence of every ID.
fn dedup_by_id(items: &mut Vec<Anime>) {
    let mut seen = HashSet::new();
    items.retain(|anime| seen.insert(anime.id));
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use oasis_api::AnimePage;

    use super::*;
    use crate::storage::Storage;

    #[derive(Debug, thiserror::Error)]
    #[error("catalog offline")]
    struct Offline;

    /// In-memory catalog serving canned pages and recording requests.
    #[derive(Default)]
    struct FakeCatalog {
        pages: HashMap<u32, (Vec<u64>, bool)>,
        offline: Mutex<bool>,
        requests: Mutex<Vec<(BrowseQuery, u32)>>,
        id_lookups: Mutex<Vec<Vec<u64>>>,
    }

    impl FakeCatalog {
        fn with_pages(pages: &[(u32, &[u64], bool)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(n, ids, more)| (*n, (ids.to_vec(), *more)))
                    .collect(),
                ..Default::default()
            }
        }

        fn set_offline(&self, offline: bool) {
            *self.offline.lock().unwrap() = offline;
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    fn anime(id: u64) -> Anime {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": { "romaji": format!("Title {id}") }
        }))
        .unwrap()
    }

    fn ids(items: &[Anime]) -> Vec<u64> {
        items.iter().map(|a| a.id).collect()
    }

    impl CatalogService for FakeCatalog {
        type Error = Offline;

        async fn browse(&self, query: &BrowseQuery, page: u32) -> Result<AnimePage, Offline> {
            self.requests.lock().unwrap().push((query.clone(), page));
            if *self.offline.lock().unwrap() {
                return Err(Offline);
            }
            let (ids, has_next_page) = self.pages.get(&page).cloned().unwrap_or_default();
            Ok(AnimePage {
                media: ids.into_iter().map(anime).collect(),
                has_next_page,
            })
        }

        async fn by_ids(&self, ids: &[u64]) -> Result<Vec<Anime>, Offline> {
            self.id_lookups.lock().unwrap().push(ids.to_vec());
            if *self.offline.lock().unwrap() {
                return Err(Offline);
            }
            Ok(ids.iter().copied().map(anime).collect())
        }

        async fn get(&self, id: u64) -> Result<Option<Anime>, Offline> {
            Ok(Some(anime(id)))
        }

        async fn genres(&self) -> Result<Vec<String>, Offline> {
            Ok(vec!["Action".into()])
        }
    }

    fn empty_watchlist() -> Watchlist {
        Watchlist::default()
    }

    #[tokio::test]
    async fn test_reload_replaces_items() {
        let catalog = FakeCatalog::with_pages(&[(1, &[1, 2, 3], true)]);
        let mut feed = Feed::new(catalog);
        assert_eq!(feed.status(), FeedStatus::Idle);

        feed.reload(&empty_watchlist()).await.unwrap();
        assert_eq!(ids(feed.items()), vec![1, 2, 3]);
        assert_eq!(feed.page(), 1);
        assert_eq!(feed.status(), FeedStatus::Ready);

        feed.reload(&empty_watchlist()).await.unwrap();
        assert_eq!(ids(feed.items()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_more_appends_without_duplicates() {
        let catalog = FakeCatalog::with_pages(&[(1, &[1, 2, 3], true), (2, &[3, 4, 5], false)]);
        let mut feed = Feed::new(catalog);
        feed.reload(&empty_watchlist()).await.unwrap();

        assert!(feed.load_more().await.unwrap());
        assert_eq!(ids(feed.items()), vec![1, 2, 3, 4, 5]);
        assert_eq!(feed.page(), 2);
        assert!(!feed.has_next_page());
        assert_eq!(feed.status(), FeedStatus::EndReached);

        // Last page reached: nothing more is requested.
        assert!(!feed.load_more().await.unwrap());
        assert_eq!(feed.catalog().request_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_within_a_page_are_dropped() {
        let catalog = FakeCatalog::with_pages(&[(1, &[7, 7, 8], false)]);
        let mut feed = Feed::new(catalog);
        feed.reload(&empty_watchlist()).await.unwrap();
        assert_eq!(ids(feed.items()), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_load_more_before_first_page_is_noop() {
        let mut feed = Feed::new(FakeCatalog::default());
        assert!(!feed.load_more().await.unwrap());
        assert_eq!(feed.catalog().request_count(), 0);
    }

    #[tokio::test]
    async fn test_filters_are_sent_with_requests() {
        let catalog = FakeCatalog::with_pages(&[(1, &[1], false)]);
        let mut feed = Feed::new(catalog);
        let changed = feed.apply_filters(FilterChange {
            search: Some("frieren".into()),
            genre: Some("Fantasy".into()),
            sort: Some(MediaSort::Score),
        });
        assert!(changed);
        feed.reload(&empty_watchlist()).await.unwrap();

        let requests = feed.catalog().requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.search, "frieren");
        assert_eq!(requests[0].0.genre, "Fantasy");
        assert_eq!(requests[0].0.sort, MediaSort::Score);
        assert_eq!(requests[0].1, 1);
    }

    #[test]
    fn test_unchanged_filters_need_no_reload() {
        let mut feed = Feed::new(FakeCatalog::default());
        assert!(feed.apply_filters(FilterChange {
            genre: Some("Drama".into()),
            ..Default::default()
        }));
        assert!(!feed.apply_filters(FilterChange {
            genre: Some("Drama".into()),
            sort: Some(MediaSort::Popularity),
            ..Default::default()
        }));
        assert_eq!(feed.query().genre, "Drama");
    }

    #[test]
    fn test_filter_change_leaves_watchlist_view() {
        let mut feed = Feed::new(FakeCatalog::default());
        assert!(feed.toggle_watchlist_view());
        // Same filters, but switching back to the catalog still needs a reload.
        assert!(feed.apply_filters(FilterChange::default()));
        assert!(!feed.is_watchlist_only());
    }

    #[tokio::test]
    async fn test_watchlist_view_loads_bookmarks() {
        let db = Storage::open_memory().unwrap();
        let mut watchlist = Watchlist::load(&db).unwrap();
        watchlist.add(&db, 30).unwrap();
        watchlist.add(&db, 10).unwrap();

        let catalog = FakeCatalog::with_pages(&[(1, &[1, 2], true)]);
        let mut feed = Feed::new(catalog);
        feed.reload(&watchlist).await.unwrap();
        assert!(feed.toggle_watchlist_view());
        assert!(feed.items().is_empty());

        feed.reload(&watchlist).await.unwrap();
        assert_eq!(ids(feed.items()), vec![30, 10]);
        assert!(!feed.has_next_page());
        assert_eq!(feed.status(), FeedStatus::Ready);

        // No infinite scroll in the watchlist view.
        assert!(!feed.load_more().await.unwrap());
        assert_eq!(feed.catalog().request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_watchlist_makes_no_request() {
        let mut feed = Feed::new(FakeCatalog::default());
        feed.toggle_watchlist_view();
        feed.reload(&empty_watchlist()).await.unwrap();
        assert!(feed.items().is_empty());
        assert!(feed.catalog().id_lookups.lock().unwrap().is_empty());
        assert_eq!(feed.status(), FeedStatus::EmptyWatchlist);
        assert_eq!(
            feed.status().message(),
            Some("Your watchlist is empty.")
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_items() {
        let catalog = FakeCatalog::with_pages(&[(1, &[1, 2], true), (2, &[3], false)]);
        let mut feed = Feed::new(catalog);
        feed.reload(&empty_watchlist()).await.unwrap();

        feed.catalog().set_offline(true);
        let err = feed.load_more().await.unwrap_err();
        assert!(matches!(err, OasisError::Catalog(_)));
        assert_eq!(ids(feed.items()), vec![1, 2]);
        assert_eq!(feed.page(), 1);
        assert!(feed.has_next_page());
        assert_eq!(feed.status(), FeedStatus::Error);
        assert_eq!(feed.last_error(), Some(LOAD_FAILED));

        // Recovers on the next successful request.
        feed.catalog().set_offline(false);
        assert!(feed.load_more().await.unwrap());
        assert_eq!(ids(feed.items()), vec![1, 2, 3]);
        assert!(feed.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_watchlist_load_keeps_cursor() {
        let db = Storage::open_memory().unwrap();
        let mut watchlist = Watchlist::load(&db).unwrap();
        watchlist.add(&db, 4).unwrap();

        let catalog = FakeCatalog::with_pages(&[(1, &[1, 2], true), (2, &[3], true)]);
        let mut feed = Feed::new(catalog);
        feed.reload(&watchlist).await.unwrap();
        assert!(feed.load_more().await.unwrap());
        assert_eq!(feed.page(), 2);

        feed.toggle_watchlist_view();
        feed.catalog().set_offline(true);
        let err = feed.reload(&watchlist).await.unwrap_err();
        assert!(matches!(err, OasisError::Catalog(_)));
        assert_eq!(feed.page(), 2);
        assert!(feed.has_next_page());
        assert_eq!(feed.status(), FeedStatus::Error);

        feed.catalog().set_offline(false);
        feed.reload(&watchlist).await.unwrap();
        assert_eq!(ids(feed.items()), vec![4]);
        assert_eq!(feed.page(), 1);
        assert!(!feed.has_next_page());
    }

    #[tokio::test]
    async fn test_no_results() {
        let mut feed = Feed::new(FakeCatalog::default());
        feed.reload(&empty_watchlist()).await.unwrap();
        assert_eq!(feed.status(), FeedStatus::NoResults);
        assert_eq!(
            feed.status().message(),
            Some("No anime found. Try a different filter?")
        );
    }
}
