//! Rankers applied after backfill.

pub mod merge_order;
pub mod shot_count;

pub use merge_order::MergeOrderRanker;
pub use shot_count::ShotCountRanker;
