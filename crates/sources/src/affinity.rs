//! Genre Affinity Scorer
//!
//! Turns a rating history into a ranking of the genre catalog.
//!
//! ## Algorithm
//! 1. Every catalog genre starts at score 0
//! 2. For each rating, add its star value to every genre of the rated movie
//!    (each genre counts once per movie; genres outside the catalog are ignored)
//! 3. Stable sort by score descending, so ties keep catalog order
//!
//! A user without ratings gets the catalog unchanged, so the top-K genres are
//! simply the first K catalog entries.

use crate::rating_history::RatingHistory;
use data_loader::{Genre, GenreId};
use serde::Serialize;
use std::collections::HashMap;

/// Accumulated star score for one genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreScore {
    pub genre: Genre,
    pub score: i64,
}

/// Catalog genres ranked by affinity, highest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenreAffinity {
    ranked: Vec<GenreScore>,
}

impl GenreAffinity {
    /// Score every catalog genre against a rating history
    pub fn compute(history: &RatingHistory, catalog: &[Genre]) -> Self {
        let mut totals: HashMap<GenreId, i64> =
            catalog.iter().map(|genre| (genre.id, 0)).collect();

        for rating in &history.ratings {
            for genre_id in distinct(&rating.genres) {
                if let Some(total) = totals.get_mut(&genre_id) {
                    *total += i64::from(rating.stars);
                }
            }
        }

        let mut ranked: Vec<GenreScore> = catalog
            .iter()
            .map(|genre| GenreScore {
                genre: genre.clone(),
                score: totals.get(&genre.id).copied().unwrap_or(0),
            })
            .collect();
        // sort_by is stable: equal scores stay in catalog order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        Self { ranked }
    }

    /// Every catalog genre, best first
    pub fn ranked(&self) -> &[GenreScore] {
        &self.ranked
    }

    /// The `k` best genres (fewer when the catalog is smaller)
    pub fn top(&self, k: usize) -> &[GenreScore] {
        &self.ranked[..k.min(self.ranked.len())]
    }

    /// Ids of the `k` best genres
    pub fn top_ids(&self, k: usize) -> Vec<GenreId> {
        self.top(k).iter().map(|s| s.genre.id).collect()
    }

    /// Score of one genre, if it is in the catalog
    pub fn score_of(&self, genre: GenreId) -> Option<i64> {
        self.ranked
            .iter()
            .find(|s| s.genre.id == genre)
            .map(|s| s.score)
    }
}

/// Genre ids with repeats removed, first occurrence kept
fn distinct(ids: &[GenreId]) -> Vec<GenreId> {
    let mut seen = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating_history::RatedMovie;
    use data_loader::User;

    const ACTION: GenreId = 28;
    const ADVENTURE: GenreId = 12;
    const COMEDY: GenreId = 35;
    const DRAMA: GenreId = 18;

    fn catalog() -> Vec<Genre> {
        [(ACTION, "Action"), (ADVENTURE, "Adventure"), (COMEDY, "Comedy"), (DRAMA, "Drama")]
            .into_iter()
            .map(|(id, name)| Genre {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    fn history(ratings: Vec<(Vec<GenreId>, i32)>) -> RatingHistory {
        RatingHistory {
            user: User {
                id: 1,
                username: "ada".to_string(),
            },
            ratings: ratings
                .into_iter()
                .enumerate()
                .map(|(i, (genres, stars))| RatedMovie {
                    movie_id: i as u32 + 1,
                    genres,
                    stars,
                })
                .collect(),
        }
    }

    #[test]
    fn test_stars_accumulate_per_genre() {
        // A {Action} 5 stars, B {Action, Drama} 3 stars
        let history = history(vec![(vec![ACTION], 5), (vec![ACTION, DRAMA], 3)]);
        let affinity = GenreAffinity::compute(&history, &catalog());

        assert_eq!(affinity.score_of(ACTION), Some(8));
        assert_eq!(affinity.score_of(DRAMA), Some(3));
        assert_eq!(affinity.score_of(COMEDY), Some(0));
        // Adventure is the first zero-score genre in catalog order
        assert_eq!(affinity.top_ids(3), vec![ACTION, DRAMA, ADVENTURE]);
    }

    #[test]
    fn test_scores_are_non_increasing() {
        let history = history(vec![
            (vec![COMEDY], 2),
            (vec![DRAMA, ADVENTURE], 4),
            (vec![COMEDY, ACTION], 1),
        ]);
        let affinity = GenreAffinity::compute(&history, &catalog());

        let scores: Vec<i64> = affinity.ranked().iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(affinity.ranked().len(), 4);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let history = history(vec![(vec![DRAMA], 4), (vec![ADVENTURE], 4)]);
        let affinity = GenreAffinity::compute(&history, &catalog());

        assert_eq!(affinity.top_ids(2), vec![ADVENTURE, DRAMA]);
    }

    #[test]
    fn test_zero_ratings_returns_catalog_prefix() {
        let affinity = GenreAffinity::compute(&history(vec![]), &catalog());

        assert_eq!(affinity.top_ids(3), vec![ACTION, ADVENTURE, COMEDY]);
    }

    #[test]
    fn test_unknown_and_repeated_genres() {
        // 999 is not in the catalog; Drama listed twice counts once
        let history = history(vec![(vec![999, DRAMA, DRAMA], 5)]);
        let affinity = GenreAffinity::compute(&history, &catalog());

        assert_eq!(affinity.score_of(DRAMA), Some(5));
        assert_eq!(affinity.score_of(999), None);
        assert_eq!(affinity.top_ids(1), vec![DRAMA]);
    }

    #[test]
    fn test_top_larger_than_catalog() {
        let affinity = GenreAffinity::compute(&history(vec![]), &catalog());
        assert_eq!(affinity.top(10).len(), 4);
    }

    #[test]
    fn test_idempotent() {
        let history = history(vec![(vec![COMEDY], 3), (vec![ACTION], 3)]);
        let first = GenreAffinity::compute(&history, &catalog());
        let second = GenreAffinity::compute(&history, &catalog());

        assert_eq!(first, second);
    }
}
