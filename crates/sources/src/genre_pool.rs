//! Candidate Pool Builder - per-genre slices
//!
//! Builds the personalized candidate pool from the user's top genres.
//!
//! ## Algorithm
//! 1. quota = ceil(target / number of genres)
//! 2. For each genre, query the base-filtered universe restricted to that
//!    genre, ordered by vote average descending, limited to quota
//! 3. Concatenate the slices in genre order, dropping movies already seen
//! 4. Truncate to target
//!
//! Movies from a higher-scored genre therefore rank earlier. The per-genre
//! queries are independent and run in parallel; results are merged in genre
//! order, so the pool is the same as a sequential build.

use crate::error::Result;
use crate::types::{Candidate, CandidateSource};
use data_loader::{GenreId, MovieFilter, MovieId, MovieOrder, MovieQuery, MovieStore};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Builds candidate pools from a ranked list of genres
pub struct GenrePoolBuilder {
    /// Shared read-only store
    store: Arc<dyn MovieStore>,

    /// Ordering applied inside each genre slice
    order: MovieOrder,
}

impl GenrePoolBuilder {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self {
            store,
            order: MovieOrder::VoteAverageDesc,
        }
    }

    /// Configure the per-genre ordering (default: vote average descending)
    pub fn with_order(mut self, order: MovieOrder) -> Self {
        self.order = order;
        self
    }

    /// Build a deduplicated pool of at most `target` candidates
    #[instrument(skip(self, base, genres), fields(genre_count = genres.len()))]
    pub fn build(
        &self,
        base: &MovieFilter,
        genres: &[GenreId],
        target: usize,
    ) -> Result<Vec<Candidate>> {
        if genres.is_empty() || target == 0 {
            return Ok(Vec::new());
        }

        let quota = per_genre_quota(target, genres.len());

        let slices = genres
            .par_iter()
            .map(|&genre| {
                let query = MovieQuery::new(base.clone().with_genre(genre), self.order)
                    .with_limit(quota);
                self.store.query_movies(&query).map(|movies| (genre, movies))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut seen: HashSet<MovieId> = HashSet::new();
        let mut pool = Vec::with_capacity(target);
        for (genre, movies) in slices {
            debug!(genre, found = movies.len(), "Genre slice");
            for movie in movies {
                if seen.insert(movie.id) {
                    pool.push(Candidate::new(movie, CandidateSource::Genre(genre)));
                }
            }
        }
        pool.truncate(target);

        debug!(candidates = pool.len(), quota, "Built genre pool");
        Ok(pool)
    }
}

/// ceil(target / genre_count); zero when there are no genres
pub fn per_genre_quota(target: usize, genre_count: usize) -> usize {
    if genre_count == 0 {
        return 0;
    }
    target.div_ceil(genre_count)
}
