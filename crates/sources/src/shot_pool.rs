//! Shot-affinity candidate pool
//!
//! Proposes the movies people post shots about: every movie in the base
//! universe with at least one shot, most-shot first (more popular first on
//! ties), truncated to target. Each candidate carries its shot count.

use crate::error::Result;
use crate::types::{Candidate, CandidateSource};
use data_loader::{MovieFilter, MovieOrder, MovieQuery, MovieStore};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct ShotPoolBuilder {
    store: Arc<dyn MovieStore>,
}

impl ShotPoolBuilder {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, base))]
    pub fn build(&self, base: &MovieFilter, target: usize) -> Result<Vec<Candidate>> {
        let query = MovieQuery::new(base.clone().with_shots(), MovieOrder::ShotCountDesc)
            .with_limit(target);

        let pool = self
            .store
            .query_movies(&query)?
            .into_iter()
            .map(|movie| -> Result<Candidate> {
                let count = self.store.shot_count(movie.id)?;
                Ok(Candidate::new(movie, CandidateSource::Shot).with_shot_count(count))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(candidates = pool.len(), "Built shot pool");
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::movie;
    use data_loader::{DataIndex, Shot};

    fn shot(id: u32, movie_id: u32) -> Shot {
        Shot {
            id,
            user_id: 1,
            title: "scene".to_string(),
            content: String::new(),
            movie_char: "Lead".to_string(),
            movie_id: Some(movie_id),
            like_users: vec![],
        }
    }

    fn store() -> Arc<dyn MovieStore> {
        let mut index = DataIndex::new();
        for id in 1..=4 {
            let mut m = movie(id, &[28]);
            m.popularity = id as f64;
            index.insert_movie(m);
        }
        let mut incomplete = movie(5, &[28]);
        incomplete.backdrop_path = String::new();
        index.insert_movie(incomplete);

        // movie 1: 1 shot, movie 2: 2 shots, movie 3: 1 shot, movie 5: 3 shots
        for (id, movie_id) in [(1, 1), (2, 2), (3, 2), (4, 3), (5, 5), (6, 5), (7, 5)] {
            index.insert_shot(shot(id, movie_id));
        }
        index.build_secondary_indices();
        index.compute_shot_counts();
        Arc::new(index)
    }

    #[test]
    fn test_most_shot_first() {
        let builder = ShotPoolBuilder::new(store());
        let pool = builder.build(&MovieFilter::complete_metadata(), 12).unwrap();

        let ids: Vec<u32> = pool.iter().map(|c| c.movie_id()).collect();
        // 3 and 1 tie on one shot; 3 is more popular. 5 lacks a backdrop.
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(pool[0].shot_count, Some(2));
        assert!(pool.iter().all(|c| c.source == CandidateSource::Shot));
    }

    #[test]
    fn test_truncated_to_target() {
        let builder = ShotPoolBuilder::new(store());
        let pool = builder.build(&MovieFilter::any(), 2).unwrap();

        let ids: Vec<u32> = pool.iter().map(|c| c.movie_id()).collect();
        assert_eq!(ids, vec![5, 2]);
    }
}
