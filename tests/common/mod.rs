//! Helpers for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use prolinq_matching::db::{DbPool, establish_connection_pool, run_migrations};
use prolinq_matching::embedding::encode_embedding;
use prolinq_matching::schema::{jobs, users};
use tempfile::TempDir;

/// Temporary database used in integration tests.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join("prolinq-test.db");
        let url = path.to_str().expect("Temporary path is not UTF-8.");

        let pool = establish_connection_pool(url).expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Failed to create tables.");

        TestDb { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn insert_user(&self, username: &str, role: &str, skills: Option<&str>) -> i32 {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(users::table)
            .values((
                users::username.eq(username),
                users::email.eq(format!("{username}@example.com")),
                users::primary_role.eq(role),
                users::is_active.eq(true),
                users::skills.eq(skills),
            ))
            .returning(users::id)
            .get_result(&mut conn)
            .expect("insert user")
    }

    pub fn insert_job(&self, title: &str, skills: Option<&str>, status: &str) -> i32 {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(jobs::table)
            .values((
                jobs::title.eq(title),
                jobs::skills_required.eq(skills),
                jobs::status.eq(status),
                jobs::created_at.eq(at(1, 8)),
            ))
            .returning(jobs::id)
            .get_result(&mut conn)
            .expect("insert job")
    }

    pub fn set_job_vector(&self, job_id: i32, vector: &[f32]) {
        let mut conn = self.pool.get().expect("connection");
        diesel::update(jobs::table.filter(jobs::id.eq(job_id)))
            .set(jobs::job_embedding.eq(encode_embedding(vector)))
            .execute(&mut conn)
            .expect("update job");
    }

    pub fn set_job_deadline(&self, job_id: i32, deadline: NaiveDateTime) {
        let mut conn = self.pool.get().expect("connection");
        diesel::update(jobs::table.filter(jobs::id.eq(job_id)))
            .set(jobs::deadline.eq(deadline))
            .execute(&mut conn)
            .expect("update job");
    }

    pub fn set_user_vector(&self, user_id: i32, vector: &[f32]) {
        let mut conn = self.pool.get().expect("connection");
        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::profile_embedding.eq(encode_embedding(vector)))
            .execute(&mut conn)
            .expect("update user");
    }
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}
