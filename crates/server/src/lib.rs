//! Server crate for the movie recommendation backend.
//!
//! This crate contains the service that coordinates all components of the
//! recommendation pipeline, plus the read-only catalog listings.

pub mod browse;
pub mod orchestrator;

pub use browse::{BrowseError, Browser, MovieDetail, MoviePage, ShotPage, Trailer};
pub use orchestrator::{RecommendationService, ShotRecommendation, TopGenre, UserRecommendation};
