use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::job::Job as DomainJob;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::jobs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
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
    pub job_embedding: Option<String>,
    pub embedding_updated_at: Option<NaiveDateTime>,
}

impl From<Job> for DomainJob {
    fn from(job: Job) -> Self {
        DomainJob {
            id: job.id,
            creator_id: job.creator_id,
            title: job.title,
            description: job.description,
            category: job.category,
            skills_required: job.skills_required,
            experience_required: job.experience_required,
            qualifications: job.qualifications,
            responsibilities: job.responsibilities,
            benefits: job.benefits,
            job_type: job.job_type,
            location: job.location,
            budget: job.budget,
            budget_min: job.budget_min,
            budget_max: job.budget_max,
            status: job.status,
            deadline: job.deadline,
            created_at: job.created_at,
            embedding: job.job_embedding,
            embedding_updated_at: job.embedding_updated_at,
        }
    }
}
