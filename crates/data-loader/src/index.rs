//! DataIndex building and indexing logic.
//!
//! Builds the DataIndex from a dataset directory:
//! - Parse every JSON file (in parallel)
//! - Fill the primary stores (users, movies, genres, videos, ratings, shots)
//! - Build the genre index and per-movie shot counts
//! - Validate cross references

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl DataIndex {
    /// Load a dataset directory into a validated DataIndex
    ///
    /// Steps:
    /// 1. Parse all files, in parallel
    /// 2. Build primary stores
    /// 3. Build the genre index
    /// 4. Count shots per movie
    /// 5. Validate references
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!(path = %data_dir.display(), "Loading movie dataset");

        let genres_path = data_dir.join("genres.json");
        let movies_path = data_dir.join("movies.json");
        let videos_path = data_dir.join("videos.json");
        let users_path = data_dir.join("users.json");
        let ratings_path = data_dir.join("ratings.json");
        let shots_path = data_dir.join("shots.json");

        // Catalog files on one side, user activity on the other
        let ((genres, (movies, videos)), (users, (ratings, shots))) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_genres(&genres_path),
                    || {
                        rayon::join(
                            || parser::parse_movies(&movies_path),
                            || parser::parse_videos(&videos_path),
                        )
                    },
                )
            },
            || {
                rayon::join(
                    || parser::parse_users(&users_path),
                    || {
                        rayon::join(
                            || parser::parse_ratings(&ratings_path),
                            || parser::parse_shots(&shots_path),
                        )
                    },
                )
            },
        );

        let genres = genres?;
        let movies = movies?;
        let videos = videos?;
        let users = users?;
        let ratings = ratings?;
        let shots = shots?;

        info!(
            genres = genres.len(),
            movies = movies.len(),
            users = users.len(),
            ratings = ratings.len(),
            shots = shots.len(),
            "Parsed dataset files"
        );

        let mut index = DataIndex::new();
        for genre in genres {
            index.insert_genre(genre);
        }
        for movie in movies {
            index.insert_movie(movie);
        }
        for video in videos {
            index.insert_video(video);
        }
        for user in users {
            index.insert_user(user);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }
        for shot in shots {
            index.insert_shot(shot);
        }

        index.build_secondary_indices();
        index.compute_shot_counts();
        index.validate()?;

        debug!("DataIndex built and validated");
        Ok(index)
    }

    /// Build the genre index after movies are loaded
    ///
    /// Movies are visited in id order, so every genre list is id-sorted.
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        for (movie_id, movie) in &self.movies {
            for &genre in &movie.genres {
                self.genre_index.entry(genre).or_default().push(*movie_id);
            }
        }
    }

    /// Count shots per movie
    ///
    /// Shots without a movie link are not counted.
    pub fn compute_shot_counts(&mut self) {
        self.shot_counts = self
            .shots
            .par_iter()
            .filter_map(|shot| shot.movie_id)
            .fold(HashMap::new, |mut counts, movie_id| {
                *counts.entry(movie_id).or_insert(0) += 1;
                counts
            })
            .reduce(HashMap::new, |mut a, b| {
                for (movie_id, count) in b {
                    *a.entry(movie_id).or_insert(0) += count;
                }
                a
            });
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - every rating points at a known user and a known movie
    /// - every shot points at a known user, and at a known movie when linked
    ///
    /// Star values are not range-checked.
    pub fn validate(&self) -> Result<()> {
        for ratings in self.user_ratings.values() {
            for rating in ratings {
                if !self.users.contains_key(&rating.user_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "User".to_string(),
                        id: rating.user_id,
                    });
                }
                if !self.movies.contains_key(&rating.movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: rating.movie_id,
                    });
                }
            }
        }

        for shot in &self.shots {
            if !self.users.contains_key(&shot.user_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "User".to_string(),
                    id: shot.user_id,
                });
            }
            if let Some(movie_id) = shot.movie_id {
                if !self.movies.contains_key(&movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: movie_id,
                    });
                }
            }
        }

        for movie in self.movies.values() {
            if movie.vote_average.is_nan() || movie.popularity.is_nan() {
                return Err(DataLoadError::InvalidValue {
                    field: format!("movie {} score", movie.id),
                    value: "NaN".to_string(),
                });
            }
        }

        Ok(())
    }
}
