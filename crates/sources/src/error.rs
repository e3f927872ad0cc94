//! Errors raised while building recommendations.

use data_loader::{DataLoadError, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// The requesting user does not exist
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// A store query failed; propagated unchanged
    #[error(transparent)]
    Store(#[from] DataLoadError),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
