//! Fixtures shared by unit tests.

use chrono::NaiveDate;
use data_loader::{
    DataLoadError, Genre, GenreId, Movie, MovieFilter, MovieId, MovieQuery, MovieStore, Result,
    Shot, User, UserId, UserRating, Video,
};

/// A movie with complete metadata and 100 votes
pub fn movie(id: MovieId, genres: &[GenreId]) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        release_date: NaiveDate::from_ymd_opt(2020, 5, 17).unwrap(),
        overview: "Overview".to_string(),
        adult: false,
        popularity: 10.0,
        vote_average: 7.0,
        vote_count: 100,
        backdrop_path: "/backdrop.jpg".to_string(),
        poster_path: "/poster.jpg".to_string(),
        genres: genres.to_vec(),
        videos: vec![],
    }
}

/// Store whose every query fails
pub struct FailingStore;

fn down<T>() -> Result<T> {
    Err(DataLoadError::Unavailable("connection refused".to_string()))
}

impl MovieStore for FailingStore {
    fn get_user(&self, _id: UserId) -> Result<Option<User>> {
        down()
    }
    fn get_movie(&self, _id: MovieId) -> Result<Option<Movie>> {
        down()
    }
    fn query_movies(&self, _query: &MovieQuery) -> Result<Vec<Movie>> {
        down()
    }
    fn count_movies(&self, _filter: &MovieFilter) -> Result<usize> {
        down()
    }
    fn query_user_ratings(&self, _user_id: UserId) -> Result<Vec<UserRating>> {
        down()
    }
    fn query_genres(&self) -> Result<Vec<Genre>> {
        down()
    }
    fn shot_count(&self, _movie_id: MovieId) -> Result<usize> {
        down()
    }
    fn videos_for(&self, _movie_id: MovieId) -> Result<Vec<Video>> {
        down()
    }
    fn query_shots(&self, _offset: usize, _limit: usize) -> Result<Vec<Shot>> {
        down()
    }
    fn count_shots(&self) -> Result<usize> {
        down()
    }
}
