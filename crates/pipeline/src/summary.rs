//! JSON-facing movie summaries.
//!
//! Genre ids are resolved against the catalog; ids missing from the catalog
//! are dropped.

use chrono::NaiveDate;
use data_loader::{Genre, GenreId, Movie, MovieId};
use serde::Serialize;
use sources::{Candidate, CandidateSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreRef {
    pub id: GenreId,
    pub name: String,
}

impl From<&Genre> for GenreRef {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub release_date: NaiveDate,
    pub overview: String,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u32,
    pub poster_path: String,
    pub backdrop_path: String,
    pub genres: Vec<GenreRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_count: Option<usize>,
    /// How the movie entered the list; not part of the payload
    #[serde(skip)]
    pub source: Option<CandidateSource>,
}

impl MovieSummary {
    pub fn from_movie(movie: &Movie, catalog: &[Genre]) -> Self {
        let genres = movie
            .genres
            .iter()
            .filter_map(|id| catalog.iter().find(|g| g.id == *id))
            .map(GenreRef::from)
            .collect();

        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.release_date,
            overview: movie.overview.clone(),
            popularity: movie.popularity,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            poster_path: movie.poster_path.clone(),
            backdrop_path: movie.backdrop_path.clone(),
            genres,
            shot_count: None,
            source: None,
        }
    }

    pub fn from_candidate(candidate: &Candidate, catalog: &[Genre]) -> Self {
        let mut summary = Self::from_movie(&candidate.movie, catalog);
        summary.shot_count = candidate.shot_count;
        summary.source = Some(candidate.source);
        summary
    }
}
