//! Rating history of one user, as read from the store.
//!
//! Only what the affinity scorer needs is kept: for every rating, the rated
//! movie, the genres attached to it and the star value.

use crate::error::{RecommendError, Result};
use data_loader::{GenreId, MovieId, MovieStore, User, UserId};
use tracing::{debug, instrument};

/// One rating reduced to the fields the scorer reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedMovie {
    pub movie_id: MovieId,
    pub genres: Vec<GenreId>,
    pub stars: i32,
}

/// All ratings a user made, in store order
#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistory {
    pub user: User,
    pub ratings: Vec<RatedMovie>,
}

impl RatingHistory {
    /// Load a user's ratings.
    ///
    /// Fails with [`RecommendError::UserNotFound`] for an unknown user.
    /// A known user without ratings yields an empty history.
    #[instrument(skip(store))]
    pub fn load(store: &dyn MovieStore, user_id: UserId) -> Result<Self> {
        let user = store
            .get_user(user_id)?
            .ok_or(RecommendError::UserNotFound(user_id))?;

        let ratings: Vec<RatedMovie> = store
            .query_user_ratings(user_id)?
            .into_iter()
            .map(|rating| RatedMovie {
                movie_id: rating.movie.id,
                genres: rating.movie.genres,
                stars: rating.stars,
            })
            .collect();

        debug!(ratings = ratings.len(), "Loaded rating history");
        Ok(Self { user, ratings })
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{movie, FailingStore};
    use data_loader::{DataIndex, DataLoadError, StarRating};

    #[test]
    fn test_load_history() {
        let mut index = DataIndex::new();
        index.insert_user(User {
            id: 1,
            username: "ada".to_string(),
        });
        index.insert_movie(movie(10, &[28, 18]));
        index.insert_rating(StarRating {
            user_id: 1,
            movie_id: 10,
            stars: 4,
        });

        let history = RatingHistory::load(&index, 1).unwrap();
        assert_eq!(history.user.username, "ada");
        assert_eq!(
            history.ratings,
            vec![RatedMovie {
                movie_id: 10,
                genres: vec![28, 18],
                stars: 4,
            }]
        );
    }

    #[test]
    fn test_user_without_ratings() {
        let mut index = DataIndex::new();
        index.insert_user(User {
            id: 2,
            username: "bo".to_string(),
        });

        let history = RatingHistory::load(&index, 2).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_unknown_user() {
        let index = DataIndex::new();
        let result = RatingHistory::load(&index, 99);

        assert!(matches!(result, Err(RecommendError::UserNotFound(99))));
    }

    #[test]
    fn test_store_error_propagates() {
        let result = RatingHistory::load(&FailingStore, 1);

        assert!(matches!(
            result,
            Err(RecommendError::Store(DataLoadError::Unavailable(_)))
        ));
    }
}
