//! Pipeline for assembling fixed-size recommendation lists.
//!
//! This crate provides:
//! - BackfillMerger for topping a candidate pool up from a fallback ordering
//! - Ranker trait and the two rankers (merge order, shot count)
//! - RecommendConfig, the tunables shared by every list
//! - MovieSummary, the JSON shape of a recommended movie
//!
//! ## Architecture
//! A list is built in stages:
//! 1. A source crate pool builder proposes candidates
//! 2. BackfillMerger fills the list up to the target size, no duplicates
//! 3. A Ranker produces the final order
//! 4. Candidates are turned into MovieSummary values
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{BackfillMerger, MergeOrderRanker, Ranker, RecommendConfig, StoreFallback};
//!
//! let config = RecommendConfig::default();
//! let today = config.resolve_today();
//! let base = config.personalized_filter(today)?;
//!
//! let fallback = StoreFallback::new(store.as_ref(), base, config.fallback_order.movie_order());
//! let outcome = BackfillMerger::new(config.target_size).merge(pool, &fallback)?;
//! let ranked = MergeOrderRanker.rank(outcome.candidates)?;
//! ```

pub mod backfill;
pub mod config;
pub mod rankers;
pub mod summary;
pub mod traits;

// Re-export main types
pub use backfill::{BackfillMerger, MergeOutcome};
pub use config::{ConfigError, FallbackOrder, RecommendConfig, MAX_WINDOW_DAYS};
pub use rankers::{MergeOrderRanker, ShotCountRanker};
pub use summary::{GenreRef, MovieSummary};
pub use traits::{FallbackSource, Ranker, StoreFallback};
