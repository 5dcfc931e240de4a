use serde::Deserialize;
use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::repository::RepositoryError;

pub mod embedding;
#[cfg(test)]
pub(crate) mod fakes;
pub mod recommendation;
pub mod search;

/// Work items accepted by the worker socket.
#[derive(Deserialize, Debug, PartialEq)]
pub enum ZMQMessage {
    EmbedJob(i32),
    EmbedUser(i32),
    EmbedAll,
    EmbedMissing,
    DailyRecommendations,
    RefreshRecommendations(i32),
    CleanupRecommendations(i32),
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("user {0} not found")]
    UserNotFound(i32),
    #[error("job {0} not found")]
    JobNotFound(i32),
    #[error("user {0} has no profile embedding")]
    MissingEmbedding(i32),
    #[error("user {0} has an invalid profile embedding")]
    InvalidEmbedding(i32),
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
