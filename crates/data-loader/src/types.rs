//! Core domain types for the movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId, GenreId, ...)
//! - Catalog records (Movie, Genre, Video) and user activity (StarRating, Shot)
//! - DataIndex, the in-memory store built from a dataset directory

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Unique identifier for a genre
pub type GenreId = u32;

/// Unique identifier for a video (trailer, teaser, ...)
pub type VideoId = u32;

/// Unique identifier for a shot post
pub type ShotId = u32;

// =============================================================================
// User-related Types
// =============================================================================

/// A registered user of the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A star rating a user gave a movie.
///
/// Stars are 1 to 5 by convention; nothing here enforces the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub stars: i32,
}

/// A rating joined with the rated movie, as returned by
/// [`MovieStore::query_user_ratings`](crate::store::MovieStore::query_user_ratings)
#[derive(Debug, Clone, PartialEq)]
pub struct UserRating {
    pub movie: Movie,
    pub stars: i32,
}

// =============================================================================
// Movie-related Types
// =============================================================================

/// Movie genre as stored in the genre catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A video attached to a movie (usually a YouTube trailer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub name: String,
    /// YouTube video key
    pub key: String,
    #[serde(default)]
    pub size: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub adult: bool,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u32,
    #[serde(default)]
    pub backdrop_path: String,
    #[serde(default)]
    pub poster_path: String,
    /// Genres attached to this movie (ids into the genre catalog)
    #[serde(default)]
    pub genres: Vec<GenreId>,
    #[serde(default)]
    pub videos: Vec<VideoId>,
}

impl Movie {
    /// True when overview, poster and backdrop are all present
    pub fn has_complete_metadata(&self) -> bool {
        !self.overview.trim().is_empty()
            && !self.poster_path.trim().is_empty()
            && !self.backdrop_path.trim().is_empty()
    }
}

// =============================================================================
// Shot Types
// =============================================================================

/// A user-generated post about a movie scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    pub id: ShotId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Character featured in the scene, free text
    #[serde(default)]
    pub movie_char: String,
    /// A shot may outlive the link to its movie
    #[serde(default)]
    pub movie_id: Option<MovieId>,
    #[serde(default)]
    pub like_users: Vec<UserId>,
}

// =============================================================================
// DataIndex - The In-Memory Store
// =============================================================================

/// Main data structure that holds all data and indices.
///
/// Movies live in a `BTreeMap` so every scan walks them in id order; this
/// keeps query results deterministic when the requested ordering ties.
/// The genre catalog is a `Vec` because its insertion order is meaningful.
#[derive(Debug)]
pub struct DataIndex {
    // Primary data stores
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) movies: BTreeMap<MovieId, Movie>,
    pub(crate) genres: Vec<Genre>,
    pub(crate) videos: HashMap<VideoId, Video>,
    pub(crate) shots: Vec<Shot>,

    /// All ratings made by each user, in insertion order
    pub(crate) user_ratings: HashMap<UserId, Vec<StarRating>>,

    // Secondary indices
    /// Movies grouped by genre (one movie can appear in multiple genre lists)
    pub(crate) genre_index: HashMap<GenreId, Vec<MovieId>>,
    /// Number of shots posted about each movie
    pub(crate) shot_counts: HashMap<MovieId, usize>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            movies: BTreeMap::new(),
            genres: Vec::new(),
            videos: HashMap::new(),
            shots: Vec::new(),
            user_ratings: HashMap::new(),
            genre_index: HashMap::new(),
            shot_counts: HashMap::new(),
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Get a genre by ID
    pub fn get_genre(&self, id: GenreId) -> Option<&Genre> {
        self.genres.iter().find(|g| g.id == id)
    }

    /// Get a video by ID
    pub fn get_video(&self, id: VideoId) -> Option<&Video> {
        self.videos.get(&id)
    }

    /// The genre catalog in insertion order
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// All users, in no particular order
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// All movies in id order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// All shots in insertion order
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[StarRating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all movies in a specific genre
    pub fn get_movies_by_genre(&self, genre: GenreId) -> &[MovieId] {
        self.genre_index
            .get(&genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of shots posted about a movie
    pub fn get_shot_count(&self, movie_id: MovieId) -> usize {
        self.shot_counts.get(&movie_id).copied().unwrap_or(0)
    }

    // Mutators - used during data loading and by tests building fixtures

    /// Insert a user into the index
    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Insert a movie into the index.
    ///
    /// Genre and video references are treated as sets: repeated ids are dropped.
    pub fn insert_movie(&mut self, mut movie: Movie) {
        dedup_in_place(&mut movie.genres);
        dedup_in_place(&mut movie.videos);
        self.movies.insert(movie.id, movie);
    }

    /// Append a genre to the catalog.
    ///
    /// Re-inserting an existing id replaces the name but keeps its position.
    pub fn insert_genre(&mut self, genre: Genre) {
        match self.genres.iter_mut().find(|g| g.id == genre.id) {
            Some(existing) => existing.name = genre.name,
            None => self.genres.push(genre),
        }
    }

    /// Insert a video into the index
    pub fn insert_video(&mut self, video: Video) {
        self.videos.insert(video.id, video);
    }

    /// Insert a rating
    pub fn insert_rating(&mut self, rating: StarRating) {
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);
    }

    /// Insert a shot
    pub fn insert_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    /// Get counts for debugging/validation: (users, movies, ratings, shots)
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let total_ratings = self.user_ratings.values().map(|v| v.len()).sum();
        (
            self.users.len(),
            self.movies.len(),
            total_ratings,
            self.shots.len(),
        )
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove repeated ids while keeping the first occurrence of each
fn dedup_in_place(ids: &mut Vec<u32>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
}
