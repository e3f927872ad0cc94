//! # Recommendation Service
//!
//! Coordinates the two recommendation lists.
//!
//! ## Personalized list (`recommend_for_user`)
//! 1. Load the user's rating history
//! 2. Score catalog genres and keep the top K
//! 3. Build the per-genre candidate pool over the personalized universe
//! 4. Backfill from the same universe in fallback order
//! 5. Keep merge order
//!
//! ## Shot-affinity list (`recommend_by_shot_affinity`)
//! 1. Build the shot pool over movies with complete metadata
//! 2. Backfill from that universe by popularity
//! 3. Rank by shot count
//!
//! Each request is one synchronous pass over the store, run on the blocking
//! pool. Nothing is cached between requests.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::{Genre, GenreId, MovieStore, UserId};
use pipeline::{
    BackfillMerger, MergeOrderRanker, MovieSummary, Ranker, RecommendConfig, ShotCountRanker,
    StoreFallback,
};
use sources::{GenreAffinity, GenrePoolBuilder, RatingHistory, ShotPoolBuilder};

use crate::browse::Browser;

/// A top genre with its affinity score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopGenre {
    pub id: GenreId,
    pub name: String,
    pub score: i64,
}

/// Personalized recommendation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecommendation {
    pub top_genres: Vec<TopGenre>,
    pub movies: Vec<MovieSummary>,
    /// Fewer movies than the target size were available
    pub truncated: bool,
}

/// Shot-affinity recommendation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRecommendation {
    pub movies: Vec<MovieSummary>,
    pub truncated: bool,
}

/// Entry point for every recommendation request
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn MovieStore>,
    config: Arc<RecommendConfig>,
    genre_pool: Arc<GenrePoolBuilder>,
    shot_pool: Arc<ShotPoolBuilder>,
    shot_ranker: Arc<ShotCountRanker>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn MovieStore>, config: RecommendConfig) -> Self {
        Self {
            genre_pool: Arc::new(GenrePoolBuilder::new(store.clone())),
            shot_pool: Arc::new(ShotPoolBuilder::new(store.clone())),
            shot_ranker: Arc::new(ShotCountRanker::new(store.clone())),
            config: Arc::new(config),
            store,
        }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Read-only catalog listings sharing this service's store and config
    pub fn browser(&self) -> Browser {
        Browser::new(self.store.clone(), self.config.clone())
    }

    /// Personalized list for a user.
    ///
    /// An unknown user fails with [`sources::RecommendError::UserNotFound`],
    /// reachable through `downcast_ref` on the returned error.
    pub async fn recommend_for_user(&self, user_id: UserId) -> Result<UserRecommendation> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.recommend_for_user_blocking(user_id))
            .await
            .context("Recommendation task panicked")?
            .with_context(|| format!("Failed to recommend movies for user {user_id}"))
    }

    /// Shot-affinity list
    pub async fn recommend_by_shot_affinity(&self) -> Result<ShotRecommendation> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.recommend_by_shot_affinity_blocking())
            .await
            .context("Recommendation task panicked")?
            .context("Failed to build shot-affinity recommendations")
    }

    /// Synchronous body of [`recommend_for_user`](Self::recommend_for_user)
    #[instrument(skip(self))]
    pub fn recommend_for_user_blocking(&self, user_id: UserId) -> Result<UserRecommendation> {
        let start_time = Instant::now();
        let config = &self.config;
        let base = config.personalized_filter(config.resolve_today())?;

        let history = RatingHistory::load(self.store.as_ref(), user_id)?;
        let catalog = self.store.query_genres()?;
        let affinity = GenreAffinity::compute(&history, &catalog);
        let top_genres = affinity.top(config.top_k_genres);
        debug!(
            ratings = history.len(),
            top = ?top_genres.iter().map(|s| s.genre.id).collect::<Vec<_>>(),
            "Scored genres"
        );

        let genre_ids = affinity.top_ids(config.top_k_genres);
        let pool = self.genre_pool.build(&base, &genre_ids, config.target_size)?;
        let pool_len = pool.len();

        let fallback =
            StoreFallback::new(self.store.as_ref(), base, config.fallback_order.movie_order());
        let outcome = BackfillMerger::new(config.target_size).merge(pool, &fallback)?;
        let ranker = MergeOrderRanker;
        let ranked = ranker.rank(outcome.candidates)?;

        info!(
            ranker = ranker.name(),
            genre_candidates = pool_len,
            fallback = outcome.fallback_consumed,
            truncated = outcome.truncated,
            "Recommended {} movies for user {} in {:.2?}",
            ranked.len(),
            user_id,
            start_time.elapsed()
        );

        Ok(UserRecommendation {
            top_genres: top_genres
                .iter()
                .map(|s| TopGenre {
                    id: s.genre.id,
                    name: s.genre.name.clone(),
                    score: s.score,
                })
                .collect(),
            movies: summarize(&ranked, &catalog),
            truncated: outcome.truncated,
        })
    }

    /// Synchronous body of [`recommend_by_shot_affinity`](Self::recommend_by_shot_affinity)
    #[instrument(skip(self))]
    pub fn recommend_by_shot_affinity_blocking(&self) -> sources::Result<ShotRecommendation> {
        let start_time = Instant::now();
        let config = &self.config;
        let base = config.shot_filter();

        let pool = self.shot_pool.build(&base, config.target_size)?;
        let pool_len = pool.len();

        let fallback =
            StoreFallback::new(self.store.as_ref(), base, config.fallback_order.movie_order());
        let outcome = BackfillMerger::new(config.target_size).merge(pool, &fallback)?;
        let ranked = self.shot_ranker.rank(outcome.candidates)?;

        info!(
            ranker = self.shot_ranker.name(),
            shot_candidates = pool_len,
            fallback = outcome.fallback_consumed,
            truncated = outcome.truncated,
            "Recommended {} movies by shot affinity in {:.2?}",
            ranked.len(),
            start_time.elapsed()
        );

        let catalog = self.store.query_genres()?;
        Ok(ShotRecommendation {
            movies: summarize(&ranked, &catalog),
            truncated: outcome.truncated,
        })
    }
}

fn summarize(candidates: &[sources::Candidate], catalog: &[Genre]) -> Vec<MovieSummary> {
    candidates
        .iter()
        .map(|c| MovieSummary::from_candidate(c, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use data_loader::DataIndex;
    use pipeline::ConfigError;
    use sources::{CandidateSource, RecommendError};
    use std::collections::HashSet;
    use std::path::PathBuf;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn sample_store() -> Arc<dyn MovieStore> {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample");
        Arc::new(DataIndex::load_from_files(&data_dir).unwrap())
    }

    fn build_service() -> RecommendationService {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        RecommendationService::new(sample_store(), RecommendConfig::default().with_today(today))
    }

    fn ids(movies: &[MovieSummary]) -> Vec<u32> {
        movies.iter().map(|m| m.id).collect()
    }

    // ============================================================================
    // Personalized
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_for_user() {
        let service = build_service();
        let result = service.recommend_for_user(1).await.unwrap();

        let top: Vec<(&str, i64)> = result
            .top_genres
            .iter()
            .map(|g| (g.name.as_str(), g.score))
            .collect();
        assert_eq!(top, vec![("Action", 8), ("Thriller", 5), ("Adventure", 3)]);

        // Only ten movies pass the personalized filter
        assert_eq!(ids(&result.movies), vec![7, 1, 5, 9, 3, 11, 2, 4, 6, 12]);
        assert!(result.truncated);
        assert_eq!(result.movies[0].source, Some(CandidateSource::Genre(28)));
        assert_eq!(result.movies[4].source, Some(CandidateSource::Fallback));
    }

    #[tokio::test]
    async fn test_user_without_ratings_uses_catalog_order() {
        let service = build_service();
        let result = service.recommend_for_user(3).await.unwrap();

        let top: Vec<&str> = result.top_genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(top, vec!["Action", "Adventure", "Animation"]);
        assert!(result.top_genres.iter().all(|g| g.score == 0));
        assert_eq!(result.movies.len(), 10);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = build_service();
        let err = service.recommend_for_user(404).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RecommendError>(),
            Some(RecommendError::UserNotFound(404))
        ));
    }

    #[tokio::test]
    async fn test_full_list_when_universe_is_large_enough() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = RecommendConfig::default()
            .with_today(today)
            .with_target_size(6);
        let service = RecommendationService::new(sample_store(), config);

        let result = service.recommend_for_user(1).await.unwrap();
        let unique: HashSet<u32> = ids(&result.movies).into_iter().collect();

        assert_eq!(ids(&result.movies), vec![7, 1, 5, 9, 3, 11]);
        assert_eq!(unique.len(), 6);
        assert!(!result.truncated);
    }

    #[tokio::test]
    async fn test_payload_shape() {
        let service = build_service();
        let result = service.recommend_for_user(2).await.unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("topGenres").is_some());
        assert_eq!(json["topGenres"][0]["name"], "Adventure");
        assert!(json["movies"][0].get("shotCount").is_none());
        assert_eq!(json["truncated"], true);
    }

    #[tokio::test]
    async fn test_invalid_window_is_a_config_error() {
        let config = RecommendConfig::default().with_window_days(i64::MAX, 30);
        let service = RecommendationService::new(sample_store(), config);

        let err = service.recommend_for_user(1).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::WindowDays {
                field: "window_days_back",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_single_top_genre() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let config = RecommendConfig::default()
            .with_today(today)
            .with_top_k_genres(1);
        let service = RecommendationService::new(sample_store(), config);

        let result = service.recommend_for_user(1).await.unwrap();

        assert_eq!(result.top_genres.len(), 1);
        assert_eq!(result.top_genres[0].name, "Action");
        assert_eq!(result.movies.len(), 10);
    }

    // ============================================================================
    // Shot affinity
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_by_shot_affinity() {
        let service = build_service();
        let result = service.recommend_by_shot_affinity().await.unwrap();

        assert_eq!(
            ids(&result.movies),
            vec![3, 9, 2, 1, 5, 11, 7, 4, 6, 10, 12, 13]
        );
        assert!(!result.truncated);

        let counts: Vec<usize> = result
            .movies
            .iter()
            .map(|m| m.shot_count.unwrap())
            .collect();
        assert_eq!(counts, vec![3, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn test_shot_affinity_on_empty_store() {
        let service =
            RecommendationService::new(Arc::new(DataIndex::new()), RecommendConfig::default());
        let result = service.recommend_by_shot_affinity().await.unwrap();

        assert!(result.movies.is_empty());
        assert!(result.truncated);
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let service = build_service();
        let handles: Vec<_> = (1..=3)
            .map(|user_id| {
                let service = service.clone();
                tokio::spawn(async move { service.recommend_for_user(user_id).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.movies.len(), 10);
        }
    }
}
