use chrono::NaiveDateTime;
use thiserror::Error;

use crate::db::{DbConnection, DbPool};
use crate::domain::{Job, NewNotification, Notification, User};

pub mod job;
pub mod notification;
pub mod user;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(error: diesel::r2d2::PoolError) -> Self {
        RepositoryError::Pool(error.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Diesel-backed implementation of every reader and writer trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

pub trait JobReader {
    fn get_job(&self, job_id: i32) -> RepositoryResult<Job>;
    /// Open jobs ordered by id.
    fn list_open_jobs(&self) -> RepositoryResult<Vec<Job>>;
    /// Open jobs with a stored vector whose deadline is unset or after `now`.
    fn list_recommendable_jobs(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Job>>;
}

pub trait JobWriter {
    fn set_job_embedding(
        &self,
        job_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}

pub trait UserReader {
    fn get_user(&self, user_id: i32) -> RepositoryResult<User>;
    fn list_users(&self) -> RepositoryResult<Vec<User>>;
    /// Active talent and freelancer users with a stored profile vector.
    fn list_recommendation_recipients(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn set_user_embedding(
        &self,
        user_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
}

pub trait NotificationReader {
    /// Recommendation notifications created in `[start, end)`, read or not.
    fn list_recommendations_between(
        &self,
        user_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Notification>>;
    fn list_unread_recommendations(&self, user_id: i32) -> RepositoryResult<Vec<Notification>>;
}

pub trait NotificationWriter {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize>;
    fn mark_notifications_read(&self, notification_ids: &[i32]) -> RepositoryResult<usize>;
    fn delete_notifications(&self, notification_ids: &[i32]) -> RepositoryResult<usize>;
}
