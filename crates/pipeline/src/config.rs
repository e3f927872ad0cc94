//! Recommendation settings.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. `today` is normally left unset and resolved from the local
//! clock per request; pinning it makes results reproducible.

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate};
use data_loader::{MovieFilter, MovieOrder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Upper bound for either side of the release window, about a century
pub const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between 0 and 36500 days, got {days}")]
    WindowDays { field: &'static str, days: i64 },

    #[error("Release window around {today} falls outside the supported date range")]
    DateOutOfRange { today: NaiveDate },
}

/// Secondary ordering used to backfill short candidate pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackOrder {
    #[default]
    Popularity,
    VoteAverage,
}

impl FallbackOrder {
    pub fn movie_order(self) -> MovieOrder {
        match self {
            FallbackOrder::Popularity => MovieOrder::PopularityDesc,
            FallbackOrder::VoteAverage => MovieOrder::VoteAverageDesc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Size of every recommendation list
    #[serde(default = "default_target_size")]
    pub target_size: usize,

    /// Number of best-scored genres feeding the candidate pool
    #[serde(default = "default_top_k_genres")]
    pub top_k_genres: usize,

    /// Movies need strictly more votes than this
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u32,

    /// Release window start, in days before today
    #[serde(default = "default_window_days_back")]
    pub window_days_back: i64,

    /// Release window end, in days after today
    #[serde(default = "default_window_days_ahead")]
    pub window_days_ahead: i64,

    #[serde(default)]
    pub fallback_order: FallbackOrder,

    /// Movies per page in browse listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Fixed reference date; local date when unset
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

fn default_target_size() -> usize {
    12
}

fn default_top_k_genres() -> usize {
    3
}

fn default_min_vote_count() -> u32 {
    50
}

fn default_window_days_back() -> i64 {
    3650
}

fn default_window_days_ahead() -> i64 {
    30
}

fn default_page_size() -> usize {
    12
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            top_k_genres: default_top_k_genres(),
            min_vote_count: default_min_vote_count(),
            window_days_back: default_window_days_back(),
            window_days_ahead: default_window_days_ahead(),
            fallback_order: FallbackOrder::default(),
            page_size: default_page_size(),
            today: None,
        }
    }
}

impl RecommendConfig {
    /// Load from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject window sizes outside `0..=MAX_WINDOW_DAYS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, days) in [
            ("window_days_back", self.window_days_back),
            ("window_days_ahead", self.window_days_ahead),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(ConfigError::WindowDays { field, days });
            }
        }
        Ok(())
    }

    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_top_k_genres(mut self, k: usize) -> Self {
        self.top_k_genres = k;
        self
    }

    pub fn with_min_vote_count(mut self, threshold: u32) -> Self {
        self.min_vote_count = threshold;
        self
    }

    pub fn with_window_days(mut self, back: i64, ahead: i64) -> Self {
        self.window_days_back = back;
        self.window_days_ahead = ahead;
        self
    }

    pub fn with_fallback_order(mut self, order: FallbackOrder) -> Self {
        self.fallback_order = order;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The pinned date, or the local date
    pub fn resolve_today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Inclusive release window around `today`
    pub fn release_window(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        self.validate()?;
        let out_of_range = ConfigError::DateOutOfRange { today };

        let start = Duration::try_days(self.window_days_back)
            .and_then(|back| today.checked_sub_signed(back))
            .ok_or_else(|| out_of_range.clone())?;
        let end = Duration::try_days(self.window_days_ahead)
            .and_then(|ahead| today.checked_add_signed(ahead))
            .ok_or(out_of_range)?;
        Ok((start, end))
    }

    /// Universe for personalized lists: complete metadata, enough votes,
    /// released inside the window
    pub fn personalized_filter(&self, today: NaiveDate) -> Result<MovieFilter, ConfigError> {
        let (start, end) = self.release_window(today)?;
        Ok(MovieFilter::complete_metadata()
            .with_min_vote_count(self.min_vote_count)
            .with_release_window(start, end))
    }

    /// Universe for the shot-affinity list: complete metadata only
    pub fn shot_filter(&self) -> MovieFilter {
        MovieFilter::complete_metadata()
    }
}
