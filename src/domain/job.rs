use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status value of jobs that still accept applications.
pub const JOB_STATUS_OPEN: &str = "open";

/// Matchable fields of a job posting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub skills_required: Option<String>,
    pub experience_required: Option<String>,
    pub qualifications: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub budget: Option<f64>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

/// A persisted job posting.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    pub id: i32,
    pub creator_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub skills_required: Option<String>,
    pub experience_required: Option<String>,
    pub qualifications: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub budget: Option<f64>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub status: String,
    pub deadline: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub embedding: Option<String>,
    pub embedding_updated_at: Option<NaiveDateTime>,
}

impl Job {
    /// Project the stored job onto the fields used for embedding.
    pub fn record(&self) -> JobRecord {
        JobRecord {
            title: Some(self.title.clone()),
            description: self.description.clone(),
            category: self.category.clone(),
            skills_required: self.skills_required.clone(),
            experience_required: self.experience_required.clone(),
            qualifications: self.qualifications.clone(),
            responsibilities: self.responsibilities.clone(),
            benefits: self.benefits.clone(),
            job_type: self.job_type.clone(),
            location: self.location.clone(),
            budget: self.budget,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
        }
    }

    /// A job is recommendable while it is open and its deadline has not passed.
    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        self.status == JOB_STATUS_OPEN && self.deadline.is_none_or(|deadline| deadline > now)
    }
}
