//! Parser for the JSON dataset files.
//!
//! A dataset directory holds one JSON array per record type:
//! - genres.json: `[{"id": 28, "name": "Action"}, ...]` (array order = catalog order)
//! - movies.json: `[{"id": 1, "title": "...", "release_date": "2021-05-01", ...}, ...]`
//! - users.json: `[{"id": 1, "username": "..."}, ...]`
//! - ratings.json: `[{"user_id": 1, "movie_id": 1, "stars": 4}, ...]`
//! - videos.json (optional): `[{"id": 1, "name": "...", "key": "...", "type": "Trailer"}, ...]`
//! - shots.json (optional): `[{"id": 1, "user_id": 1, "title": "...", "movie_id": 1}, ...]`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parse a JSON array of records from any reader.
///
/// `file` is only used to label parse errors.
pub fn parse_records<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    serde_json::from_reader(reader).map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// Open and parse a required dataset file
fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|_| DataLoadError::FileNotFound {
        path: path.display().to_string(),
    })?;
    parse_records(BufReader::new(file), &file_label(path))
}

/// Parse an optional dataset file; a missing file yields no records
fn parse_optional_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Optional dataset file absent");
        return Ok(Vec::new());
    }
    parse_file(path)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse the genres.json file
pub fn parse_genres(path: &Path) -> Result<Vec<Genre>> {
    parse_file(path)
}

/// Parse the movies.json file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    parse_file(path)
}

/// Parse the users.json file
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    parse_file(path)
}

/// Parse the ratings.json file
pub fn parse_ratings(path: &Path) -> Result<Vec<StarRating>> {
    parse_file(path)
}

/// Parse the videos.json file, if present
pub fn parse_videos(path: &Path) -> Result<Vec<Video>> {
    parse_optional_file(path)
}

/// Parse the shots.json file, if present
pub fn parse_shots(path: &Path) -> Result<Vec<Shot>> {
    parse_optional_file(path)
}
