//! The catalog seam.
//!
//! The feed only talks to a [`CatalogService`], so browsing logic can be
//! exercised against an in-memory catalog in tests.

use std::future::Future;

use crate::media::Anime;
use crate::query::{AnimePage, BrowseQuery};

/// A read-only anime catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of titles matching the filter bar state.
    fn browse(
        &self,
        query: &BrowseQuery,
        page: u32,
    ) -> impl Future<Output = Result<AnimePage, Self::Error>> + Send;

    /// Fetch titles by catalog ID, in the order given.
    fn by_ids(&self, ids: &[u64]) -> impl Future<Output = Result<Vec<Anime>, Self::Error>> + Send;

    /// Fetch a single title.
    fn get(&self, id: u64) -> impl Future<Output = Result<Option<Anime>, Self::Error>> + Send;

    /// All genre names the catalog knows.
    fn genres(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}
