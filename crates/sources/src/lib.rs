//! # Sources Crate
//!
//! Everything that turns a user's activity into candidate movies.
//!
//! ## Components
//!
//! ### Rating history
//! Reads a user's star ratings through the store, keeping the genres of
//! each rated movie.
//!
//! ### Genre affinity
//! Sums star values per catalog genre and ranks genres by that score
//! (stable, so ties follow catalog order).
//!
//! ### Genre pool
//! Takes the top genres and pulls the best-voted movies of each, with an
//! equal quota per genre, into one deduplicated pool.
//!
//! ### Shot pool
//! Movies users post shots about, most-shot first.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{GenreAffinity, GenrePoolBuilder, RatingHistory};
//! use data_loader::{DataIndex, MovieFilter, MovieStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn MovieStore> = Arc::new(DataIndex::load_from_files(path)?);
//!
//! let history = RatingHistory::load(store.as_ref(), user_id)?;
//! let affinity = GenreAffinity::compute(&history, &store.query_genres()?);
//!
//! let pool = GenrePoolBuilder::new(store.clone())
//!     .build(&MovieFilter::complete_metadata(), &affinity.top_ids(3), 12)?;
//! ```

pub mod affinity;
pub mod error;
pub mod genre_pool;
pub mod rating_history;
pub mod shot_pool;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use affinity::{GenreAffinity, GenreScore};
pub use error::{RecommendError, Result};
pub use genre_pool::{per_genre_quota, GenrePoolBuilder};
pub use rating_history::{RatedMovie, RatingHistory};
pub use shot_pool::ShotPoolBuilder;
pub use types::{Candidate, CandidateSource};
