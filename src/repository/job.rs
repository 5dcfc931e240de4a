use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::Job;
use crate::domain::job::JOB_STATUS_OPEN;
use crate::models::job::Job as DbJob;
use crate::repository::{DieselRepository, JobReader, JobWriter, RepositoryResult};

impl JobReader for DieselRepository {
    fn get_job(&self, job_id: i32) -> RepositoryResult<Job> {
        use crate::schema::jobs;

        let mut conn = self.conn()?;

        let result = jobs::table
            .filter(jobs::id.eq(job_id))
            .select(DbJob::as_select())
            .first::<DbJob>(&mut conn)?;

        Ok(result.into())
    }

    fn list_open_jobs(&self) -> RepositoryResult<Vec<Job>> {
        use crate::schema::jobs;

        let mut conn = self.conn()?;

        let result = jobs::table
            .filter(jobs::status.eq(JOB_STATUS_OPEN))
            .order(jobs::id.asc())
            .select(DbJob::as_select())
            .load::<DbJob>(&mut conn)?;

        Ok(result.into_iter().map(Job::from).collect())
    }

    fn list_recommendable_jobs(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Job>> {
        use crate::schema::jobs;

        let mut conn = self.conn()?;

        let result = jobs::table
            .filter(jobs::status.eq(JOB_STATUS_OPEN))
            .filter(jobs::job_embedding.is_not_null())
            .filter(jobs::deadline.is_null().or(jobs::deadline.gt(now)))
            .order(jobs::id.asc())
            .select(DbJob::as_select())
            .load::<DbJob>(&mut conn)?;

        Ok(result.into_iter().map(Job::from).collect())
    }
}

impl JobWriter for DieselRepository {
    fn set_job_embedding(
        &self,
        job_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::jobs;

        let mut conn = self.conn()?;

        let affected = diesel::update(jobs::table.filter(jobs::id.eq(job_id)))
            .set((
                jobs::job_embedding.eq(embedding),
                jobs::embedding_updated_at.eq(updated_at),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
