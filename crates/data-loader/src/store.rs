//! Query interface over the movie catalog.
//!
//! The recommendation core never touches [`DataIndex`] directly; it goes
//! through [`MovieStore`], which exposes the handful of filtered/ordered
//! queries the core needs. `DataIndex` is the in-memory implementation.
//!
//! ## Ordering
//!
//! Every [`MovieOrder`] is applied as a stable sort over movies scanned in
//! id order, so two movies that tie on the sort key always come back with
//! the lower id first. Callers rely on this for reproducible result sets.

use crate::error::Result;
use crate::types::*;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Predicate over catalog movies. An empty (default) filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub require_overview: bool,
    pub require_poster: bool,
    pub require_backdrop: bool,
    /// Exclusive lower bound on vote_count
    pub min_vote_count: Option<u32>,
    /// Inclusive range on vote_average
    pub vote_average: Option<(f64, f64)>,
    /// Inclusive range on release_date
    pub release_window: Option<(NaiveDate, NaiveDate)>,
    /// Movie must carry this genre
    pub genre: Option<GenreId>,
    /// Movie must have at least one shot
    pub with_shots: bool,
}

impl MovieFilter {
    /// Filter that matches every movie
    pub fn any() -> Self {
        Self::default()
    }

    /// Require non-empty overview, poster path and backdrop path
    pub fn complete_metadata() -> Self {
        Self {
            require_overview: true,
            require_poster: true,
            require_backdrop: true,
            ..Self::default()
        }
    }

    pub fn with_min_vote_count(mut self, threshold: u32) -> Self {
        self.min_vote_count = Some(threshold);
        self
    }

    pub fn with_vote_average(mut self, min: f64, max: f64) -> Self {
        self.vote_average = Some((min, max));
        self
    }

    pub fn with_release_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.release_window = Some((start, end));
        self
    }

    pub fn with_genre(mut self, genre: GenreId) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_shots(mut self) -> Self {
        self.with_shots = true;
        self
    }

    /// Evaluate the predicate against a movie and its shot count
    pub fn matches(&self, movie: &Movie, shot_count: usize) -> bool {
        if self.require_overview && movie.overview.trim().is_empty() {
            return false;
        }
        if self.require_poster && movie.poster_path.trim().is_empty() {
            return false;
        }
        if self.require_backdrop && movie.backdrop_path.trim().is_empty() {
            return false;
        }
        if let Some(threshold) = self.min_vote_count {
            if movie.vote_count <= threshold {
                return false;
            }
        }
        if let Some((min, max)) = self.vote_average {
            if movie.vote_average < min || movie.vote_average > max {
                return false;
            }
        }
        if let Some((start, end)) = self.release_window {
            if movie.release_date < start || movie.release_date > end {
                return false;
            }
        }
        if let Some(genre) = self.genre {
            if !movie.genres.contains(&genre) {
                return false;
            }
        }
        !(self.with_shots && shot_count == 0)
    }
}

/// Sort orders supported by [`MovieStore::query_movies`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieOrder {
    /// Catalog id ascending
    Id,
    #[default]
    PopularityDesc,
    VoteAverageDesc,
    ReleaseDateDesc,
    /// Vote average descending, newer release first on ties
    VoteAverageThenReleaseDesc,
    /// Shot count descending, more popular first on ties
    ShotCountDesc,
}

/// A filtered, ordered, paged movie query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    pub filter: MovieFilter,
    pub order: MovieOrder,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl MovieQuery {
    pub fn new(filter: MovieFilter, order: MovieOrder) -> Self {
        Self {
            filter,
            order,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Read-only access to the movie catalog, users and their activity.
///
/// Implementations must be safe to share across request threads.
pub trait MovieStore: Send + Sync {
    /// Look up a user; `Ok(None)` when the id is unknown
    fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Look up a movie; `Ok(None)` when the id is unknown
    fn get_movie(&self, id: MovieId) -> Result<Option<Movie>>;

    /// Movies matching `query.filter`, sorted by `query.order`, then paged
    fn query_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>>;

    /// Number of movies matching a filter
    fn count_movies(&self, filter: &MovieFilter) -> Result<usize>;

    /// Every rating the user made, joined with the rated movie
    fn query_user_ratings(&self, user_id: UserId) -> Result<Vec<UserRating>>;

    /// The genre catalog in catalog order
    fn query_genres(&self) -> Result<Vec<Genre>>;

    /// Number of shots posted about a movie
    fn shot_count(&self, movie_id: MovieId) -> Result<usize>;

    /// Videos attached to a movie, in the movie's reference order
    fn videos_for(&self, movie_id: MovieId) -> Result<Vec<Video>>;

    /// Shots newest first (highest id first), then paged
    fn query_shots(&self, offset: usize, limit: usize) -> Result<Vec<Shot>>;

    /// Total number of shots
    fn count_shots(&self) -> Result<usize>;
}

impl DataIndex {
    /// Movies matching a filter, in id order
    fn matching<'a>(&'a self, filter: &'a MovieFilter) -> Vec<&'a Movie> {
        let matches = |movie: &&Movie| filter.matches(movie, self.get_shot_count(movie.id));

        match filter.genre {
            // The genre index is built in id order, so this agrees with a full scan
            Some(genre) => self
                .get_movies_by_genre(genre)
                .iter()
                .filter_map(|id| self.movies.get(id))
                .filter(matches)
                .collect(),
            None => self.movies.values().filter(matches).collect(),
        }
    }

    fn compare(&self, order: MovieOrder, a: &Movie, b: &Movie) -> Ordering {
        match order {
            MovieOrder::Id => a.id.cmp(&b.id),
            MovieOrder::PopularityDesc => b.popularity.total_cmp(&a.popularity),
            MovieOrder::VoteAverageDesc => b.vote_average.total_cmp(&a.vote_average),
            MovieOrder::ReleaseDateDesc => b.release_date.cmp(&a.release_date),
            MovieOrder::VoteAverageThenReleaseDesc => b
                .vote_average
                .total_cmp(&a.vote_average)
                .then_with(|| b.release_date.cmp(&a.release_date)),
            MovieOrder::ShotCountDesc => self
                .get_shot_count(b.id)
                .cmp(&self.get_shot_count(a.id))
                .then_with(|| b.popularity.total_cmp(&a.popularity)),
        }
    }
}

impl MovieStore for DataIndex {
    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(DataIndex::get_user(self, id).cloned())
    }

    fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        Ok(DataIndex::get_movie(self, id).cloned())
    }

    fn query_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>> {
        let mut movies = self.matching(&query.filter);
        // sort_by is stable: ties stay in id order
        movies.sort_by(|a, b| self.compare(query.order, a, b));

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(movies
            .into_iter()
            .skip(query.offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_movies(&self, filter: &MovieFilter) -> Result<usize> {
        Ok(self.matching(filter).len())
    }

    fn query_user_ratings(&self, user_id: UserId) -> Result<Vec<UserRating>> {
        Ok(self
            .get_user_ratings(user_id)
            .iter()
            .filter_map(|rating| {
                self.movies.get(&rating.movie_id).map(|movie| UserRating {
                    movie: movie.clone(),
                    stars: rating.stars,
                })
            })
            .collect())
    }

    fn query_genres(&self) -> Result<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    fn shot_count(&self, movie_id: MovieId) -> Result<usize> {
        Ok(self.get_shot_count(movie_id))
    }

    fn videos_for(&self, movie_id: MovieId) -> Result<Vec<Video>> {
        let Some(movie) = self.movies.get(&movie_id) else {
            return Ok(Vec::new());
        };
        Ok(movie
            .videos
            .iter()
            .filter_map(|id| self.get_video(*id).cloned())
            .collect())
    }

    fn query_shots(&self, offset: usize, limit: usize) -> Result<Vec<Shot>> {
        let mut shots: Vec<&Shot> = self.shots.iter().collect();
        shots.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(shots
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_shots(&self) -> Result<usize> {
        Ok(self.shots.len())
    }
}
