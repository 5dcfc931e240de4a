//! Domain types shared by the embedding, matching and processing layers.

use serde::{Deserialize, Serialize};

pub mod job;
pub mod notification;
pub mod user;

pub use job::{Job, JobRecord};
pub use notification::{NewNotification, Notification, RecommendationData};
pub use user::{ProfileRecord, User};

/// A record that can be projected to text and embedded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbeddableRecord {
    Job(JobRecord),
    Profile(ProfileRecord),
}

impl From<JobRecord> for EmbeddableRecord {
    fn from(record: JobRecord) -> Self {
        EmbeddableRecord::Job(record)
    }
}

impl From<ProfileRecord> for EmbeddableRecord {
    fn from(record: ProfileRecord) -> Self {
        EmbeddableRecord::Profile(record)
    }
}
