//! Orders candidates by how many shots were posted about them.
//!
//! Candidates without a shot count are looked up in the store first. The
//! sort is stable, so candidates with equal counts keep their merged order.

use crate::traits::Ranker;
use data_loader::MovieStore;
use sources::{Candidate, Result};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

pub struct ShotCountRanker {
    store: Arc<dyn MovieStore>,
}

impl ShotCountRanker {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }
}

impl Ranker for ShotCountRanker {
    fn name(&self) -> &str {
        "shot_count"
    }

    fn rank(&self, mut candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let mut lookups = 0;
        for candidate in candidates.iter_mut() {
            if candidate.shot_count.is_none() {
                candidate.shot_count = Some(self.store.shot_count(candidate.movie_id())?);
                lookups += 1;
            }
        }
        debug!(lookups, "Annotated shot counts");

        candidates.sort_by_key(|c| Reverse(c.shot_count.unwrap_or(0)));
        Ok(candidates)
    }
}
