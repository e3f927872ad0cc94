//! # Data Loader Crate
//!
//! This crate loads and indexes the movie catalog and user activity that the
//! recommendation core reads.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (User, Movie, Genre, Video, Shot, DataIndex)
//! - **parser**: Parse the JSON dataset files into Rust structs
//! - **index**: Build the genre index and shot counts, validate references
//! - **store**: The `MovieStore` query interface and its in-memory implementation
//! - **error**: Error types for loading and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DataIndex, MovieFilter, MovieOrder, MovieQuery, MovieStore};
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/sample"))?;
//!
//! let query = MovieQuery::new(MovieFilter::complete_metadata(), MovieOrder::PopularityDesc)
//!     .with_limit(12);
//! for movie in index.query_movies(&query)? {
//!     println!("{} ({})", movie.title, movie.release_date);
//! }
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use store::{MovieFilter, MovieOrder, MovieQuery, MovieStore};
pub use types::{
    // Type aliases
    GenreId,
    MovieId,
    ShotId,
    UserId,
    VideoId,
    // Core types
    DataIndex,
    Genre,
    Movie,
    Shot,
    StarRating,
    User,
    UserRating,
    Video,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: "Arrival".to_string(),
            release_date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
            overview: "Linguist meets visitors".to_string(),
            adult: false,
            popularity: 40.2,
            vote_average: 7.6,
            vote_count: 15000,
            backdrop_path: "/b.jpg".to_string(),
            poster_path: "/p.jpg".to_string(),
            genres: vec![18, 878, 18],
            videos: vec![3, 3],
        }
    }

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (users, movies, ratings, shots) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
        assert_eq!(shots, 0);
    }

    #[test]
    fn test_insert_movie_dedups_references() {
        let mut index = DataIndex::new();
        index.insert_movie(movie(1));

        let retrieved = index.get_movie(1).unwrap();
        assert_eq!(retrieved.genres, vec![18, 878]);
        assert_eq!(retrieved.videos, vec![3]);
        assert!(retrieved.has_complete_metadata());
    }

    #[test]
    fn test_genre_catalog_keeps_insertion_order() {
        let mut index = DataIndex::new();
        for (id, name) in [(28, "Action"), (12, "Adventure"), (16, "Animation")] {
            index.insert_genre(Genre {
                id,
                name: name.to_string(),
            });
        }
        index.insert_genre(Genre {
            id: 12,
            name: "Adventures".to_string(),
        });

        let ids: Vec<GenreId> = index.genres().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![28, 12, 16]);
        assert_eq!(index.get_genre(12).unwrap().name, "Adventures");
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();
        index.insert_rating(StarRating {
            user_id: 1,
            movie_id: 1193,
            stars: 5,
        });

        let user_ratings = index.get_user_ratings(1);
        assert_eq!(user_ratings.len(), 1);
        assert_eq!(user_ratings[0].stars, 5);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_user(999).is_none());
        assert!(index.get_movie(999).is_none());
        assert!(index.get_user_ratings(999).is_empty());
        assert!(index.get_movies_by_genre(28).is_empty());
        assert_eq!(index.get_shot_count(999), 0);
    }
}
