//! Bookmarked catalog IDs.

use crate::error::OasisError;
use crate::storage::Storage;

/// Outcome of a watchlist toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistChange {
    Added,
    Removed,
}

/// In-memory view of the persisted watchlist. IDs are unique and keep the
/// order they were added in. Every mutation is written through to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    ids: Vec<u64>,
}

impl Watchlist {
    pub fn load(store: &Storage) -> Result<Self, OasisError> {
        let mut ids = store.watchlist_ids()?;
        dedup_in_order(&mut ids);
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, anime_id: u64) -> bool {
        self.ids.contains(&anime_id)
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, store: &Storage, anime_id: u64) -> Result<WatchlistChange, OasisError> {
        if self.contains(anime_id) {
            self.remove(store, anime_id)?;
            Ok(WatchlistChange::Removed)
        } else {
            self.add(store, anime_id)?;
            Ok(WatchlistChange::Added)
        }
    }

    /// Append an ID. Returns `false` without touching anything if it is
    /// already bookmarked.
    pub fn add(&mut self, store: &Storage, anime_id: u64) -> Result<bool, OasisError> {
        if self.contains(anime_id) {
            return Ok(false);
        }
        store.watchlist_add(anime_id)?;
        self.ids.push(anime_id);
        tracing::info!(anime_id, "added to watchlist");
        Ok(true)
    }

    /// Returns `false` if the ID was not bookmarked.
    pub fn remove(&mut self, store: &Storage, anime_id: u64) -> Result<bool, OasisError> {
        if !self.contains(anime_id) {
            return Ok(false);
        }
        store.watchlist_remove(anime_id)?;
        self.ids.retain(|id| *id != anime_id);
        tracing::info!(anime_id, "removed from watchlist");
        Ok(true)
    }

    pub fn clear(&mut self, store: &Storage) -> Result<(), OasisError> {
        store.watchlist_clear()?;
        self.ids.clear();
        tracing::info!("watchlist cleared");
        Ok(())
    }
}

fn dedup_in_order(ids: &mut Vec<u64>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_is_not_added_twice() {
        let db = Storage::open_memory().unwrap();
        let mut list = Watchlist::load(&db).unwrap();
        assert!(list.add(&db, 21).unwrap());
        assert!(!list.add(&db, 21).unwrap());
        assert_eq!(list.ids(), &[21]);
        assert_eq!(db.watchlist_ids().unwrap(), vec![21]);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let db = Storage::open_memory().unwrap();
        let mut list = Watchlist::load(&db).unwrap();
        list.add(&db, 1).unwrap();

        assert_eq!(list.toggle(&db, 2).unwrap(), WatchlistChange::Added);
        assert!(list.contains(2));
        assert_eq!(list.toggle(&db, 2).unwrap(), WatchlistChange::Removed);
        assert!(!list.contains(2));
        assert_eq!(list.ids(), &[1]);
        assert_eq!(db.watchlist_ids().unwrap(), vec![1]);
    }

    #[test]
    fn test_toggle_appends_at_end() {
        let db = Storage::open_memory().unwrap();
        let mut list = Watchlist::load(&db).unwrap();
        for id in [5, 3, 9] {
            list.toggle(&db, id).unwrap();
        }
        list.toggle(&db, 3).unwrap();
        list.toggle(&db, 3).unwrap();
        assert_eq!(list.ids(), &[5, 9, 3]);
    }

    #[test]
    fn test_load_reflects_storage() {
        let db = Storage::open_memory().unwrap();
        db.watchlist_add(7).unwrap();
        db.watchlist_add(8).unwrap();
        let list = Watchlist::load(&db).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(7));
        assert!(!list.is_empty());
    }

    #[test]
    fn test_remove_missing_and_clear() {
        let db = Storage::open_memory().unwrap();
        let mut list = Watchlist::load(&db).unwrap();
        assert!(!list.remove(&db, 99).unwrap());
        list.add(&db, 1).unwrap();
        list.add(&db, 2).unwrap();
        list.clear(&db).unwrap();
        assert!(list.is_empty());
        assert!(db.watchlist_ids().unwrap().is_empty());
    }
}
