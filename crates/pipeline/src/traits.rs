//! Core traits for the recommendation pipeline.
//!
//! - [`FallbackSource`]: an ordered sequence the backfill merger reads in slices
//! - [`Ranker`]: the final ordering applied to a merged candidate list

use data_loader::{Movie, MovieFilter, MovieOrder, MovieQuery, MovieStore};
use sources::{Candidate, Result};

/// An ordered movie sequence read by offset.
///
/// `fetch` past the end returns an empty vector; the merger treats that as
/// exhaustion.
pub trait FallbackSource {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<Movie>>;
}

impl FallbackSource for [Movie] {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<Movie>> {
        Ok(self.iter().skip(offset).take(limit).cloned().collect())
    }
}

/// Fallback read straight from the store, one paged query per slice
pub struct StoreFallback<'a> {
    store: &'a dyn MovieStore,
    filter: MovieFilter,
    order: MovieOrder,
}

impl<'a> StoreFallback<'a> {
    pub fn new(store: &'a dyn MovieStore, filter: MovieFilter, order: MovieOrder) -> Self {
        Self {
            store,
            filter,
            order,
        }
    }
}

impl FallbackSource for StoreFallback<'_> {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<Movie>> {
        let query = MovieQuery::new(self.filter.clone(), self.order)
            .with_offset(offset)
            .with_limit(limit);
        Ok(self.store.query_movies(&query)?)
    }
}

/// Final ordering of a merged candidate list.
///
/// `Send + Sync` so rankers can be held by the shared service.
pub trait Ranker: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Reorder (and possibly annotate) the candidates; never adds or drops any
    fn rank(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>>;
}
