//! Keeps the merged order: genre slices first, then backfill.

use crate::traits::Ranker;
use sources::{Candidate, Result};

pub struct MergeOrderRanker;

impl Ranker for MergeOrderRanker {
    fn name(&self) -> &str {
        "merge_order"
    }

    fn rank(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        Ok(candidates)
    }
}
