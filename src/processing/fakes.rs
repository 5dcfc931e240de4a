//! In-memory repository used by the processing unit tests.

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::job::JOB_STATUS_OPEN;
use crate::domain::{Job, NewNotification, Notification, User};
use crate::embedding::encode_embedding;
use crate::repository::{
    JobReader, JobWriter, NotificationReader, NotificationWriter, RepositoryError,
    RepositoryResult, UserReader, UserWriter,
};

pub(crate) fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub(crate) fn job(id: i32, title: &str, embedding: Option<&[f32]>) -> Job {
    Job {
        id,
        creator_id: None,
        title: title.to_string(),
        description: None,
        category: None,
        skills_required: None,
        experience_required: None,
        qualifications: None,
        responsibilities: None,
        benefits: None,
        job_type: None,
        location: None,
        budget: None,
        budget_min: None,
        budget_max: None,
        status: JOB_STATUS_OPEN.to_string(),
        deadline: None,
        created_at: at(1, 8),
        embedding: embedding.map(encode_embedding),
        embedding_updated_at: None,
    }
}

pub(crate) fn user(id: i32, role: &str, embedding: Option<&[f32]>) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        primary_role: Some(role.to_string()),
        is_active: true,
        professional_title: None,
        bio: None,
        skills: None,
        experience: None,
        education: None,
        location: None,
        company_name: None,
        embedding: embedding.map(encode_embedding),
        embedding_updated_at: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub jobs: Vec<Job>,
    pub users: Vec<User>,
    pub notifications: Vec<Notification>,
    pub fail_writes: bool,
}

#[derive(Default)]
pub(crate) struct FakeRepo {
    pub state: Mutex<FakeState>,
}

impl FakeRepo {
    pub fn new(jobs: Vec<Job>, users: Vec<User>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                jobs,
                users,
                ..Default::default()
            }),
        }
    }

    pub fn seed_notification(&self, notification: NewNotification, is_read: bool) -> i32 {
        let mut state = self.state.lock().expect("state mutex poisoned");
        let id = state
            .notifications
            .iter()
            .map(|notification| notification.id)
            .max()
            .unwrap_or(0)
            + 1;
        state.notifications.push(Notification {
            id,
            user_id: notification.user_id,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            is_read,
            data: notification.data,
            created_at: notification.created_at,
        });
        id
    }

    pub fn notifications(&self) -> Vec<Notification> {
        let state = self.state.lock().expect("state mutex poisoned");
        state.notifications.clone()
    }

    pub fn job(&self, job_id: i32) -> Option<Job> {
        let state = self.state.lock().expect("state mutex poisoned");
        state.jobs.iter().find(|job| job.id == job_id).cloned()
    }

    pub fn user(&self, user_id: i32) -> Option<User> {
        let state = self.state.lock().expect("state mutex poisoned");
        state.users.iter().find(|user| user.id == user_id).cloned()
    }

    pub fn fail_writes(&self) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        state.fail_writes = true;
    }

    fn check_writes(state: &FakeState) -> RepositoryResult<()> {
        if state.fail_writes {
            return Err(RepositoryError::Unexpected("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl JobReader for FakeRepo {
    fn get_job(&self, job_id: i32) -> RepositoryResult<Job> {
        self.job(job_id).ok_or(RepositoryError::NotFound)
    }

    fn list_open_jobs(&self) -> RepositoryResult<Vec<Job>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state
            .jobs
            .iter()
            .filter(|job| job.status == JOB_STATUS_OPEN)
            .cloned()
            .collect())
    }

    fn list_recommendable_jobs(&self, now: NaiveDateTime) -> RepositoryResult<Vec<Job>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state
            .jobs
            .iter()
            .filter(|job| job.is_open_at(now) && job.embedding.is_some())
            .cloned()
            .collect())
    }
}

impl JobWriter for FakeRepo {
    fn set_job_embedding(
        &self,
        job_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        Self::check_writes(&state)?;
        let mut affected = 0;
        for job in state.jobs.iter_mut().filter(|job| job.id == job_id) {
            job.embedding = Some(embedding.to_string());
            job.embedding_updated_at = Some(updated_at);
            affected += 1;
        }
        Ok(affected)
    }
}

impl UserReader for FakeRepo {
    fn get_user(&self, user_id: i32) -> RepositoryResult<User> {
        self.user(user_id).ok_or(RepositoryError::NotFound)
    }

    fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state.users.clone())
    }

    fn list_recommendation_recipients(&self) -> RepositoryResult<Vec<User>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state
            .users
            .iter()
            .filter(|user| user.is_active && user.is_talent() && user.embedding.is_some())
            .cloned()
            .collect())
    }
}

impl UserWriter for FakeRepo {
    fn set_user_embedding(
        &self,
        user_id: i32,
        embedding: &str,
        updated_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        Self::check_writes(&state)?;
        let mut affected = 0;
        for user in state.users.iter_mut().filter(|user| user.id == user_id) {
            user.embedding = Some(embedding.to_string());
            user.embedding_updated_at = Some(updated_at);
            affected += 1;
        }
        Ok(affected)
    }
}

impl NotificationReader for FakeRepo {
    fn list_recommendations_between(
        &self,
        user_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<Notification>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state
            .notifications
            .iter()
            .filter(|notification| {
                notification.user_id == user_id
                    && notification.created_at >= start
                    && notification.created_at < end
            })
            .cloned()
            .collect())
    }

    fn list_unread_recommendations(&self, user_id: i32) -> RepositoryResult<Vec<Notification>> {
        let state = self.state.lock().expect("state mutex poisoned");
        Ok(state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id && !notification.is_read)
            .cloned()
            .collect())
    }
}

impl NotificationWriter for FakeRepo {
    fn create_notifications(&self, notifications: &[NewNotification]) -> RepositoryResult<usize> {
        {
            let state = self.state.lock().expect("state mutex poisoned");
            Self::check_writes(&state)?;
        }
        for notification in notifications {
            self.seed_notification(notification.clone(), false);
        }
        Ok(notifications.len())
    }

    fn mark_notifications_read(&self, notification_ids: &[i32]) -> RepositoryResult<usize> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        Self::check_writes(&state)?;
        let mut affected = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification_ids.contains(&notification.id))
        {
            notification.is_read = true;
            affected += 1;
        }
        Ok(affected)
    }

    fn delete_notifications(&self, notification_ids: &[i32]) -> RepositoryResult<usize> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        Self::check_writes(&state)?;
        let before = state.notifications.len();
        state
            .notifications
            .retain(|notification| !notification_ids.contains(&notification.id));
        Ok(before - state.notifications.len())
    }
}
