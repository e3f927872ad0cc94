//! Candidate types shared by every pool builder.

use data_loader::{GenreId, Movie, MovieId};
use serde::Serialize;

/// Where a candidate entered the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "genreId", rename_all = "camelCase")]
pub enum CandidateSource {
    /// Per-genre slice of the personalized pool
    Genre(GenreId),
    /// Movie with shots about it
    Shot,
    /// Backfill from the fallback ordering
    Fallback,
}

/// A movie proposed for the final list
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub movie: Movie,
    pub source: CandidateSource,
    /// Filled in by pools and rankers that look at shots
    pub shot_count: Option<usize>,
}

impl Candidate {
    pub fn new(movie: Movie, source: CandidateSource) -> Self {
        Self {
            movie,
            source,
            shot_count: None,
        }
    }

    pub fn with_shot_count(mut self, count: usize) -> Self {
        self.shot_count = Some(count);
        self
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie.id
    }
}
