use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::domain::notification::match_percentage;
use crate::domain::{Job, NewNotification, Notification, User};
use crate::embedding::{decode_embedding, parse_embedding};
use crate::matching::{MatchPolicy, accepted, rank_candidates, round_score};
use crate::processing::ProcessingError;
use crate::repository::{
    JobReader, NotificationReader, NotificationWriter, RepositoryError, UserReader,
};

/// A job recommended to a user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobRecommendation {
    pub job_id: i32,
    pub title: String,
    /// Cosine similarity rounded to three decimals.
    pub similarity_score: f32,
    pub match_percentage: u32,
}

impl JobRecommendation {
    fn new(job: &Job, score: f32) -> Self {
        Self {
            job_id: job.id,
            title: job.title.clone(),
            similarity_score: round_score(score),
            match_percentage: match_percentage(score),
        }
    }

    pub fn notification(&self, user_id: i32, created_at: NaiveDateTime) -> NewNotification {
        NewNotification::job_recommendation(
            user_id,
            self.job_id,
            &self.title,
            self.similarity_score,
            created_at,
        )
    }
}

/// Outcome of reconciling today's recommendation notifications.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailySync {
    pub recommendations: Vec<JobRecommendation>,
    /// Whether recommendation notifications already existed today.
    pub from_cache: bool,
    pub archived: usize,
    pub created: usize,
}

/// Outcome of a forced recommendation refresh.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub previous_count: usize,
    pub new_count: usize,
    pub archived: usize,
    pub created: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailyRunStats {
    pub users_loaded: usize,
    pub jobs_loaded: usize,
    pub users_skipped: usize,
    pub users_failed: usize,
    pub notifications_created: usize,
}

/// An unread recommendation whose job is still open.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveRecommendation {
    pub notification_id: i32,
    pub job_id: i32,
    pub job_title: String,
    pub match_percentage: u32,
    pub match_score: f32,
    pub created_at: NaiveDateTime,
    pub job_deadline: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ActiveRecommendations {
    pub recommendations: Vec<ActiveRecommendation>,
    pub cleaned_up: usize,
}

/// Decode the stored profile vector of `user`.
pub fn profile_embedding(user: &User) -> Result<Vec<f32>, ProcessingError> {
    let encoded = user
        .embedding
        .as_deref()
        .filter(|encoded| !encoded.trim().is_empty())
        .ok_or(ProcessingError::MissingEmbedding(user.id))?;

    match parse_embedding(encoded) {
        Ok(embedding) if !embedding.is_empty() => Ok(embedding),
        Ok(_) => Err(ProcessingError::InvalidEmbedding(user.id)),
        Err(error) => {
            log::warn!("User {} has a malformed profile embedding: {error}", user.id);
            Err(ProcessingError::InvalidEmbedding(user.id))
        }
    }
}

/// Rank `jobs` for `user` by their stored vectors.
///
/// Jobs without a usable vector are skipped. Results below the policy
/// threshold are dropped.
pub fn recommend_jobs(
    user: &User,
    jobs: &[Job],
    policy: &MatchPolicy,
) -> Result<Vec<JobRecommendation>, ProcessingError> {
    let query = profile_embedding(user)?;

    let candidates = jobs.iter().filter_map(|job| {
        let embedding = decode_embedding(job.embedding.as_deref()?);
        if embedding.is_empty() {
            log::debug!("Skipping job {} without a usable embedding", job.id);
            return None;
        }
        Some((job, embedding))
    });

    Ok(accepted(rank_candidates(&query, candidates, policy))
        .into_iter()
        .map(|result| JobRecommendation::new(result.candidate, result.score))
        .collect())
}

fn day_bounds(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = now.date().and_time(NaiveTime::MIN);
    (start, start + Duration::days(1))
}

fn load_user<R>(user_id: i32, repo: &R) -> Result<User, ProcessingError>
where
    R: UserReader,
{
    repo.get_user(user_id).map_err(|error| match error {
        RepositoryError::NotFound => ProcessingError::UserNotFound(user_id),
        other => other.into(),
    })
}

fn recommended_job_ids(notifications: &[Notification]) -> HashSet<i32> {
    notifications
        .iter()
        .filter_map(Notification::job_id)
        .collect()
}

/// Reconcile today's recommendation notifications with a fresh ranking.
///
/// When the recommended set changed, notifications for jobs that dropped out
/// are archived and notifications for newly recommended jobs are created.
pub fn sync_daily_recommendations<R>(
    user_id: i32,
    now: NaiveDateTime,
    policy: &MatchPolicy,
    repo: &R,
) -> Result<DailySync, ProcessingError>
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    let user = load_user(user_id, repo)?;
    profile_embedding(&user)?;

    let (start, end) = day_bounds(now);
    let existing = repo.list_recommendations_between(user_id, start, end)?;
    let existing_job_ids = recommended_job_ids(&existing);

    let jobs = repo.list_recommendable_jobs(now)?;
    let recommendations = recommend_jobs(&user, &jobs, policy)?;
    let new_job_ids: HashSet<i32> = recommendations.iter().map(|rec| rec.job_id).collect();

    let mut sync = DailySync {
        from_cache: !existing.is_empty(),
        ..Default::default()
    };

    if new_job_ids != existing_job_ids {
        log::info!(
            "Recommendations changed for user {user_id}: {} previous, {} current",
            existing_job_ids.len(),
            new_job_ids.len()
        );

        let to_archive: Vec<i32> = existing
            .iter()
            .filter(|notification| {
                notification
                    .job_id()
                    .is_some_and(|job_id| !new_job_ids.contains(&job_id))
            })
            .map(|notification| notification.id)
            .collect();
        sync.archived = repo.mark_notifications_read(&to_archive)?;

        let to_create: Vec<NewNotification> = recommendations
            .iter()
            .filter(|rec| !existing_job_ids.contains(&rec.job_id))
            .map(|rec| rec.notification(user_id, now))
            .collect();
        sync.created = repo.create_notifications(&to_create)?;
    }

    sync.recommendations = recommendations;
    Ok(sync)
}

/// Recompute recommendations against every unread recommendation notification.
///
/// Unread notifications outside the new ranking are archived.
pub fn refresh_recommendations<R>(
    user_id: i32,
    now: NaiveDateTime,
    policy: &MatchPolicy,
    repo: &R,
) -> Result<RefreshOutcome, ProcessingError>
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    let user = load_user(user_id, repo)?;
    profile_embedding(&user)?;

    let existing = repo.list_unread_recommendations(user_id)?;
    let existing_job_ids = recommended_job_ids(&existing);

    let jobs = repo.list_recommendable_jobs(now)?;
    let recommendations = recommend_jobs(&user, &jobs, policy)?;
    let new_job_ids: HashSet<i32> = recommendations.iter().map(|rec| rec.job_id).collect();

    let to_archive: Vec<i32> = existing
        .iter()
        .filter(|notification| {
            notification
                .job_id()
                .is_none_or(|job_id| !new_job_ids.contains(&job_id))
        })
        .map(|notification| notification.id)
        .collect();
    let archived = repo.mark_notifications_read(&to_archive)?;

    let to_create: Vec<NewNotification> = recommendations
        .iter()
        .filter(|rec| !existing_job_ids.contains(&rec.job_id))
        .map(|rec| rec.notification(user_id, now))
        .collect();
    let created = repo.create_notifications(&to_create)?;

    Ok(RefreshOutcome {
        previous_count: existing_job_ids.len(),
        new_count: new_job_ids.len(),
        archived,
        created,
    })
}

fn generate_for_user<R>(
    user: &User,
    jobs: &[Job],
    now: NaiveDateTime,
    policy: &MatchPolicy,
    repo: &R,
) -> Result<Option<usize>, ProcessingError>
where
    R: NotificationReader + NotificationWriter,
{
    let (start, end) = day_bounds(now);
    let today = repo.list_recommendations_between(user.id, start, end)?;

    let unread_today = today.iter().filter(|notification| !notification.is_read).count();
    if unread_today > 0 {
        log::info!(
            "User {} already has {unread_today} unread recommendations from today, skipping",
            user.id
        );
        return Ok(None);
    }

    let already_recommended = recommended_job_ids(&today);
    let to_create: Vec<NewNotification> = recommend_jobs(user, jobs, policy)?
        .iter()
        .filter(|rec| !already_recommended.contains(&rec.job_id))
        .map(|rec| rec.notification(user.id, now))
        .collect();

    Ok(Some(repo.create_notifications(&to_create)?))
}

/// Create today's recommendation notifications for every eligible user.
///
/// Users who already have unread recommendations from today are skipped;
/// per-user failures are logged and do not stop the batch.
pub fn generate_daily_recommendations<R>(
    now: NaiveDateTime,
    policy: &MatchPolicy,
    repo: &R,
) -> Result<DailyRunStats, ProcessingError>
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    let mut stats = DailyRunStats::default();

    let users = repo.list_recommendation_recipients()?;
    stats.users_loaded = users.len();
    if users.is_empty() {
        log::warn!("No active users found for recommendations");
        return Ok(stats);
    }

    let jobs = repo.list_recommendable_jobs(now)?;
    stats.jobs_loaded = jobs.len();

    for user in &users {
        match generate_for_user(user, &jobs, now, policy, repo) {
            Ok(Some(created)) => stats.notifications_created += created,
            Ok(None) => stats.users_skipped += 1,
            Err(error) => {
                log::error!("Failed to generate recommendations for user {}: {error}", user.id);
                stats.users_failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Split unread recommendations into those whose job is still open and the
/// ids of stale ones.
fn partition_unread<R>(
    user_id: i32,
    now: NaiveDateTime,
    repo: &R,
) -> Result<(Vec<(Notification, Job)>, Vec<i32>), ProcessingError>
where
    R: JobReader + NotificationReader,
{
    let mut active = Vec::new();
    let mut stale = Vec::new();

    for notification in repo.list_unread_recommendations(user_id)? {
        let Some(job_id) = notification.job_id() else {
            stale.push(notification.id);
            continue;
        };

        match repo.get_job(job_id) {
            Ok(job) if job.is_open_at(now) => active.push((notification, job)),
            Ok(_) | Err(RepositoryError::NotFound) => {
                log::debug!("Job {job_id} is gone or closed, removing notification");
                stale.push(notification.id);
            }
            Err(error) => {
                log::error!(
                    "Failed to check job {job_id} for notification {}: {error}",
                    notification.id
                );
            }
        }
    }

    Ok((active, stale))
}

/// Delete unread recommendations whose job is gone, closed, past its
/// deadline, or unknown. Returns the number deleted.
pub fn cleanup_expired_recommendations<R>(
    user_id: i32,
    now: NaiveDateTime,
    repo: &R,
) -> Result<usize, ProcessingError>
where
    R: JobReader + NotificationReader + NotificationWriter,
{
    let (_, stale) = partition_unread(user_id, now, repo)?;
    Ok(repo.delete_notifications(&stale)?)
}

/// Clean up stale recommendations and list the remaining unread ones.
pub fn active_recommendations<R>(
    user_id: i32,
    now: NaiveDateTime,
    repo: &R,
) -> Result<ActiveRecommendations, ProcessingError>
where
    R: JobReader + NotificationReader + NotificationWriter,
{
    let (active, stale) = partition_unread(user_id, now, repo)?;
    let cleaned_up = repo.delete_notifications(&stale)?;

    let recommendations = active
        .into_iter()
        .map(|(notification, job)| {
            let data = notification.recommendation_data().unwrap_or_default();
            ActiveRecommendation {
                notification_id: notification.id,
                job_id: job.id,
                job_title: job.title,
                match_percentage: data.match_percentage.unwrap_or(0),
                match_score: data.match_score.unwrap_or(0.0),
                created_at: notification.created_at,
                job_deadline: job.deadline,
            }
        })
        .collect();

    Ok(ActiveRecommendations {
        recommendations,
        cleaned_up,
    })
}

/// Top jobs for the daily email digest; empty when anything goes wrong.
pub fn digest_recommendations<R>(
    user_id: i32,
    now: NaiveDateTime,
    policy: &MatchPolicy,
    repo: &R,
) -> Vec<Job>
where
    R: UserReader + JobReader,
{
    let outcome = load_user(user_id, repo).and_then(|user| {
        let jobs = repo.list_recommendable_jobs(now)?;
        let ranked = recommend_jobs(&user, &jobs, policy)?;
        Ok(ranked
            .iter()
            .filter_map(|rec| jobs.iter().find(|job| job.id == rec.job_id).cloned())
            .collect::<Vec<Job>>())
    });

    match outcome {
        Ok(jobs) => jobs,
        Err(error) => {
            log::warn!("No digest recommendations for user {user_id}: {error}");
            Vec::new()
        }
    }
}

/// Handle the daily batch message.
pub async fn process_daily_recommendations_message<R>(repo: R, policy: MatchPolicy)
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    log::info!("Received DailyRecommendations");

    match generate_daily_recommendations(Utc::now().naive_utc(), &policy, &repo) {
        Ok(stats) => log::info!(
            "Finished DailyRecommendations: users_loaded={}, jobs_loaded={}, users_skipped={}, users_failed={}, notifications_created={}",
            stats.users_loaded,
            stats.jobs_loaded,
            stats.users_skipped,
            stats.users_failed,
            stats.notifications_created
        ),
        Err(error) => log::error!("DailyRecommendations failed: {error}"),
    }
}

/// Handle a forced refresh for one user.
pub async fn process_refresh_recommendations_message<R>(user_id: i32, repo: R, policy: MatchPolicy)
where
    R: UserReader + JobReader + NotificationReader + NotificationWriter,
{
    log::info!("Received RefreshRecommendations for user {user_id}");

    match refresh_recommendations(user_id, Utc::now().naive_utc(), &policy, &repo) {
        Ok(outcome) => log::info!(
            "Finished RefreshRecommendations for user {user_id}: previous_count={}, new_count={}, archived={}, created={}",
            outcome.previous_count,
            outcome.new_count,
            outcome.archived,
            outcome.created
        ),
        Err(error) => log::error!("RefreshRecommendations failed for user {user_id}: {error}"),
    }
}

/// Handle a cleanup request for one user.
pub async fn process_cleanup_recommendations_message<R>(user_id: i32, repo: R)
where
    R: JobReader + NotificationReader + NotificationWriter,
{
    log::info!("Received CleanupRecommendations for user {user_id}");

    match cleanup_expired_recommendations(user_id, Utc::now().naive_utc(), &repo) {
        Ok(deleted) => {
            log::info!("Finished CleanupRecommendations for user {user_id}: deleted={deleted}")
        }
        Err(error) => log::error!("CleanupRecommendations failed for user {user_id}: {error}"),
    }
}
