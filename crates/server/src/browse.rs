//! Catalog listings: genres, paged movie lists, a random trailer, single
//! movie details and the shot feed.
//!
//! Paged lists report `maxPage` as the number of pages needed to hold every
//! matching item. Asking for a page past the end returns an empty list.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use data_loader::{
    DataLoadError, MovieFilter, MovieId, MovieOrder, MovieQuery, MovieStore, Shot, UserId, Video,
};
use pipeline::{GenreRef, MovieSummary, RecommendConfig};

/// Half-width, in days, of the window around today used by now-playing
/// listings and the trailer pick
pub const NOW_PLAYING_DAYS: i64 = 30;

/// How many of the most recent movies the trailer is picked from
pub const TRAILER_CANDIDATES: usize = 20;

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const TMDB_ORIGINAL: &str = "https://image.tmdb.org/t/p/original";

#[derive(Error, Debug)]
pub enum BrowseError {
    /// No recent movie has a video attached
    #[error("No trailer available for recent movies")]
    NoTrailer,

    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error(transparent)]
    Store(#[from] DataLoadError),
}

pub type Result<T> = std::result::Result<T, BrowseError>;

/// One page of a movie listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub max_page: usize,
    pub movie_cnt: usize,
    pub movies: Vec<MovieSummary>,
}

/// A recent movie with an embeddable trailer URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trailer {
    pub movie: MovieSummary,
    pub trailer: String,
}

/// One movie with everything its detail view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    /// Embed of the first video, or the full-size poster without one
    pub url_path: String,
    /// The viewer's star rating of this movie
    pub stars: Option<i32>,
    pub movie: MovieSummary,
    pub videos: Vec<Video>,
}

/// One page of the shot feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotPage {
    pub max_page: usize,
    pub shot_cnt: usize,
    pub shots: Vec<Shot>,
}

/// Read-only listings over the catalog
pub struct Browser {
    store: Arc<dyn MovieStore>,
    config: Arc<RecommendConfig>,
}

impl Browser {
    pub fn new(store: Arc<dyn MovieStore>, config: Arc<RecommendConfig>) -> Self {
        Self { store, config }
    }

    /// The genre catalog in catalog order
    pub fn genres(&self) -> Result<Vec<GenreRef>> {
        Ok(self
            .store
            .query_genres()?
            .iter()
            .map(GenreRef::from)
            .collect())
    }

    /// Whole catalog, most popular first
    pub fn popular(&self, page: usize) -> Result<MoviePage> {
        self.page(MovieFilter::any(), MovieOrder::PopularityDesc, page)
    }

    /// Movies released around today, newest first
    pub fn now_playing(&self, page: usize) -> Result<MoviePage> {
        self.page(self.now_playing_filter(), MovieOrder::ReleaseDateDesc, page)
    }

    /// Movies released around today, best voted first
    pub fn top_rated(&self, page: usize) -> Result<MoviePage> {
        self.page(
            self.now_playing_filter(),
            MovieOrder::VoteAverageThenReleaseDesc,
            page,
        )
    }

    /// Pick a random trailer among the most recent movies that have one
    #[instrument(skip_all)]
    pub fn trailer<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Trailer> {
        let query = MovieQuery::new(self.now_playing_filter(), MovieOrder::ReleaseDateDesc)
            .with_limit(TRAILER_CANDIDATES);

        let mut with_video = Vec::new();
        for movie in self.store.query_movies(&query)? {
            if let Some(video) = self.store.videos_for(movie.id)?.into_iter().next() {
                with_video.push((movie, video));
            }
        }
        debug!(candidates = with_video.len(), "Trailer candidates");

        let (movie, video) = with_video.choose(rng).ok_or(BrowseError::NoTrailer)?;
        let catalog = self.store.query_genres()?;
        Ok(Trailer {
            movie: MovieSummary::from_movie(movie, &catalog),
            trailer: format!("{YOUTUBE_EMBED}{}", video.key),
        })
    }

    /// A movie with its videos, plus the viewer's rating when given
    #[instrument(skip(self))]
    pub fn detail(&self, movie_id: MovieId, viewer: Option<UserId>) -> Result<MovieDetail> {
        let movie = self
            .store
            .get_movie(movie_id)?
            .ok_or(BrowseError::MovieNotFound(movie_id))?;
        let videos = self.store.videos_for(movie_id)?;

        let stars = match viewer {
            Some(user_id) => self
                .store
                .query_user_ratings(user_id)?
                .into_iter()
                .find(|rating| rating.movie.id == movie_id)
                .map(|rating| rating.stars),
            None => None,
        };

        let url_path = match videos.first() {
            Some(video) => format!("{YOUTUBE_EMBED}{}", video.key),
            None => format!("{TMDB_ORIGINAL}{}", movie.poster_path),
        };

        let catalog = self.store.query_genres()?;
        Ok(MovieDetail {
            url_path,
            stars,
            movie: MovieSummary::from_movie(&movie, &catalog),
            videos,
        })
    }

    /// Every shot, newest first
    pub fn shots(&self, page: usize) -> Result<ShotPage> {
        let size = self.config.page_size.max(1);
        let total = self.store.count_shots()?;
        let shots = self.store.query_shots(page.saturating_mul(size), size)?;

        Ok(ShotPage {
            max_page: total.div_ceil(size),
            shot_cnt: size,
            shots,
        })
    }

    fn now_playing_filter(&self) -> MovieFilter {
        let (start, end) = now_playing_window(self.config.resolve_today());
        MovieFilter::any().with_release_window(start, end)
    }

    fn page(&self, filter: MovieFilter, order: MovieOrder, page: usize) -> Result<MoviePage> {
        let size = self.config.page_size.max(1);
        let total = self.store.count_movies(&filter)?;

        let query = MovieQuery::new(filter, order)
            .with_offset(page.saturating_mul(size))
            .with_limit(size);
        let catalog = self.store.query_genres()?;
        let movies = self
            .store
            .query_movies(&query)?
            .iter()
            .map(|m| MovieSummary::from_movie(m, &catalog))
            .collect();

        Ok(MoviePage {
            max_page: total.div_ceil(size),
            movie_cnt: size,
            movies,
        })
    }
}

/// [today - 30 days, today + 30 days]
pub fn now_playing_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (
        today - Duration::days(NOW_PLAYING_DAYS),
        today + Duration::days(NOW_PLAYING_DAYS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::DataIndex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;

    fn browser_with(config: RecommendConfig) -> Browser {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample");
        let store = Arc::new(DataIndex::load_from_files(&data_dir).unwrap());
        Browser::new(store, Arc::new(config))
    }

    fn browser_at(today: NaiveDate) -> Browser {
        browser_with(RecommendConfig::default().with_today(today))
    }

    fn browser() -> Browser {
        browser_at(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn ids(page: &MoviePage) -> Vec<u32> {
        page.movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_genres_in_catalog_order() {
        let genres = browser().genres().unwrap();
        assert_eq!(genres.len(), 8);
        assert_eq!(genres[0].name, "Action");
        assert_eq!(genres[7].name, "Thriller");
    }

    #[test]
    fn test_popular_pages() {
        let browser = browser();

        let first = browser.popular(0).unwrap();
        assert_eq!(ids(&first), vec![1, 8, 5, 3, 9, 11, 2, 7, 4, 14, 6, 10]);
        assert_eq!(first.max_page, 2);
        assert_eq!(first.movie_cnt, 12);

        assert_eq!(ids(&browser.popular(1).unwrap()), vec![12, 13]);
        assert!(browser.popular(2).unwrap().movies.is_empty());
    }

    #[test]
    fn test_now_playing_newest_first() {
        let page = browser().now_playing(0).unwrap();

        assert_eq!(ids(&page), vec![11, 3, 14, 8, 1, 5]);
        assert_eq!(page.max_page, 1);
    }

    #[test]
    fn test_top_rated_in_window() {
        let page = browser().top_rated(0).unwrap();
        assert_eq!(ids(&page), vec![1, 14, 8, 5, 3, 11]);
    }

    #[test]
    fn test_trailer_from_recent_movie_with_video() {
        let browser = browser();
        let mut rng = StdRng::seed_from_u64(7);

        let expected = [
            (11, "mwFinal444"),
            (3, "pmTeaser22"),
            (1, "ih0Trailer1"),
            (5, "nsTrailer33"),
        ];
        for _ in 0..10 {
            let trailer = browser.trailer(&mut rng).unwrap();
            let (_, key) = expected
                .iter()
                .find(|(id, _)| *id == trailer.movie.id)
                .expect("trailer picked from a movie without video");
            assert_eq!(trailer.trailer, format!("https://www.youtube.com/embed/{key}"));
        }
    }

    #[test]
    fn test_no_trailer() {
        let browser = browser_at(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        let result = browser.trailer(&mut StdRng::seed_from_u64(1));

        assert!(matches!(result, Err(BrowseError::NoTrailer)));
    }

    #[test]
    fn test_detail_with_trailer_and_rating() {
        let detail = browser().detail(1, Some(1)).unwrap();

        assert_eq!(detail.movie.title, "Iron Harbor");
        assert_eq!(detail.url_path, "https://www.youtube.com/embed/ih0Trailer1");
        assert_eq!(detail.stars, Some(5));
        assert_eq!(detail.videos.len(), 1);
    }

    #[test]
    fn test_detail_uses_first_video() {
        let detail = browser().detail(11, None).unwrap();

        assert_eq!(detail.url_path, "https://www.youtube.com/embed/mwFinal444");
        assert_eq!(detail.videos.len(), 2);
        assert_eq!(detail.stars, None);
    }

    #[test]
    fn test_detail_falls_back_to_poster() {
        let detail = browser().detail(2, Some(2)).unwrap();

        assert_eq!(
            detail.url_path,
            "https://image.tmdb.org/t/p/original/long_quiet_p.jpg"
        );
        assert!(detail.videos.is_empty());
        // User 2 never rated this movie
        assert_eq!(detail.stars, None);
    }

    #[test]
    fn test_detail_unknown_movie() {
        let result = browser().detail(404, Some(1));
        assert!(matches!(result, Err(BrowseError::MovieNotFound(404))));
    }

    #[test]
    fn test_shot_feed_newest_first() {
        let page = browser().shots(0).unwrap();

        let ids: Vec<u32> = page.shots.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=12).rev().collect::<Vec<_>>());
        assert_eq!(page.max_page, 1);
    }

    #[test]
    fn test_shot_feed_pages() {
        let browser = browser_with(RecommendConfig::default().with_page_size(5));
        let shot_ids = |page| -> Vec<u32> {
            browser
                .shots(page)
                .unwrap()
                .shots
                .iter()
                .map(|s| s.id)
                .collect()
        };

        assert_eq!(shot_ids(0), vec![12, 11, 10, 9, 8]);
        assert_eq!(shot_ids(2), vec![2, 1]);
        assert!(shot_ids(3).is_empty());
        assert_eq!(browser.shots(0).unwrap().max_page, 3);
    }

    #[test]
    fn test_page_json_shape() {
        let json = serde_json::to_value(browser().now_playing(0).unwrap()).unwrap();

        assert_eq!(json["maxPage"], 1);
        assert_eq!(json["movieCnt"], 12);
        assert_eq!(json["movies"].as_array().unwrap().len(), 6);
    }
}
