//! Backfill Merger
//!
//! Tops a candidate pool up to the target size from a fallback sequence.
//!
//! ## Algorithm
//! 1. Start from the pool (first-seen order, duplicates dropped, at most N)
//! 2. While the result is shorter than N:
//!    - request the next `N - len` fallback movies at the cursor
//!    - stop if the slice is empty (fallback exhausted)
//!    - append every movie not already present
//!    - advance the cursor by the requested size, however many were appended
//! 3. `truncated` is set when the result is still shorter than N
//!
//! Advancing by the requested size means a fallback movie that was skipped
//! as a duplicate is never looked at again, and each round needs at most one
//! query. The loop ends because every round either grows the result or
//! moves the cursor past the end of the fallback.

use crate::traits::FallbackSource;
use data_loader::MovieId;
use sources::{Candidate, CandidateSource, Result};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Result of a merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub candidates: Vec<Candidate>,
    /// Fewer than the target were available
    pub truncated: bool,
    /// Number of movies appended from the fallback
    pub fallback_consumed: usize,
}

/// Merges a candidate pool with a fallback sequence up to a fixed size
#[derive(Debug, Clone, Copy)]
pub struct BackfillMerger {
    target: usize,
}

impl BackfillMerger {
    pub fn new(target: usize) -> Self {
        Self { target }
    }

    #[instrument(skip_all, fields(target = self.target, pool = pool.len()))]
    pub fn merge<F>(&self, pool: Vec<Candidate>, fallback: &F) -> Result<MergeOutcome>
    where
        F: FallbackSource + ?Sized,
    {
        let mut seen: HashSet<MovieId> = HashSet::new();
        let mut candidates: Vec<Candidate> = pool
            .into_iter()
            .filter(|c| seen.insert(c.movie_id()))
            .take(self.target)
            .collect();

        let mut cursor = 0;
        let mut fallback_consumed = 0;
        while candidates.len() < self.target {
            let wanted = self.target - candidates.len();
            let slice = fallback.fetch(cursor, wanted)?;
            if slice.is_empty() {
                debug!(cursor, "Fallback exhausted");
                break;
            }

            for movie in slice {
                if candidates.len() >= self.target {
                    break;
                }
                if seen.insert(movie.id) {
                    candidates.push(Candidate::new(movie, CandidateSource::Fallback));
                    fallback_consumed += 1;
                }
            }
            cursor += wanted;
        }

        let truncated = candidates.len() < self.target;
        debug!(
            total = candidates.len(),
            fallback_consumed, truncated, "Backfill complete"
        );

        Ok(MergeOutcome {
            candidates,
            truncated,
            fallback_consumed,
        })
    }
}
