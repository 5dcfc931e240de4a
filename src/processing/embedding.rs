use chrono::{NaiveDateTime, Utc};

use crate::domain::{EmbeddableRecord, Job, User};
use crate::embedding::{EmbeddingError, EmbeddingGenerator, encode_embedding, parse_embedding};
use crate::processing::ProcessingError;
use crate::repository::{
    JobReader, JobWriter, RepositoryError, RepositoryResult, UserReader, UserWriter,
};

/// Counters reported after a batch embedding run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmbeddingStats {
    pub jobs_loaded: usize,
    pub users_loaded: usize,
    pub job_embeddings_generated: usize,
    pub user_embeddings_generated: usize,
    pub reused: usize,
    pub skipped_empty: usize,
    pub failed: usize,
}

impl EmbeddingStats {
    fn record_failure(&mut self, subject: &str, error: &ProcessingError) {
        match error {
            ProcessingError::Embedding(EmbeddingError::EmptyRecord) => {
                log::debug!("Skipping {subject}: nothing to embed");
                self.skipped_empty += 1;
            }
            other => {
                log::error!("Failed to embed {subject}: {other}");
                self.failed += 1;
            }
        }
    }
}

/// Return the stored embedding when it is usable, otherwise generate and persist one.
///
/// Malformed or empty stored vectors are regenerated. A stored vector whose
/// length differs from the active model is regenerated only while a model is
/// loaded; the keyword fallback never replaces a model vector. Returns the
/// embedding and whether it was newly generated.
pub fn load_or_generate_embedding<F>(
    existing: Option<&str>,
    record: &EmbeddableRecord,
    generator: &EmbeddingGenerator,
    persist: F,
) -> Result<(Vec<f32>, bool), ProcessingError>
where
    F: FnOnce(&str) -> RepositoryResult<usize>,
{
    if let Some(encoded) = existing {
        match parse_embedding(encoded) {
            Ok(embedding) if embedding.len() == generator.get_embedding_dimension() => {
                return Ok((embedding, false));
            }
            Ok(embedding) if !embedding.is_empty() && generator.is_fallback() => {
                log::debug!(
                    "Keeping stored {}-dimension embedding while the model is unavailable",
                    embedding.len()
                );
                return Ok((embedding, false));
            }
            Ok(embedding) => log::info!(
                "Stored embedding has {} dimensions, expected {}; regenerating",
                embedding.len(),
                generator.get_embedding_dimension()
            ),
            Err(error) => log::warn!("Stored embedding is malformed, regenerating: {error}"),
        }
    }

    let generated = generator.embed(record)?;
    persist(&encode_embedding(&generated))?;

    Ok((generated, true))
}

fn store_job_embedding<R>(
    job: &Job,
    repo: &R,
    generator: &EmbeddingGenerator,
    now: NaiveDateTime,
) -> Result<usize, ProcessingError>
where
    R: JobWriter,
{
    let embedding = generator.embed_job(&job.record())?;
    repo.set_job_embedding(job.id, &encode_embedding(&embedding), now)?;
    Ok(embedding.len())
}

fn store_user_embedding<R>(
    user: &User,
    repo: &R,
    generator: &EmbeddingGenerator,
    now: NaiveDateTime,
) -> Result<usize, ProcessingError>
where
    R: UserWriter,
{
    let embedding = generator.embed_user(&user.record())?;
    repo.set_user_embedding(user.id, &encode_embedding(&embedding), now)?;
    Ok(embedding.len())
}

/// Regenerate and persist the embedding of one job, returning its dimension.
pub fn refresh_job_embedding<R>(
    job_id: i32,
    repo: &R,
    generator: &EmbeddingGenerator,
) -> Result<usize, ProcessingError>
where
    R: JobReader + JobWriter,
{
    let job = repo.get_job(job_id).map_err(|error| match error {
        RepositoryError::NotFound => ProcessingError::JobNotFound(job_id),
        other => other.into(),
    })?;

    store_job_embedding(&job, repo, generator, Utc::now().naive_utc())
}

/// Regenerate and persist the profile embedding of one user, returning its dimension.
pub fn refresh_user_embedding<R>(
    user_id: i32,
    repo: &R,
    generator: &EmbeddingGenerator,
) -> Result<usize, ProcessingError>
where
    R: UserReader + UserWriter,
{
    let user = repo.get_user(user_id).map_err(|error| match error {
        RepositoryError::NotFound => ProcessingError::UserNotFound(user_id),
        other => other.into(),
    })?;

    store_user_embedding(&user, repo, generator, Utc::now().naive_utc())
}

/// Regenerate every open job and every user embedding.
///
/// Individual failures are counted and skipped.
pub fn refresh_all_embeddings<R>(
    repo: &R,
    generator: &EmbeddingGenerator,
) -> Result<EmbeddingStats, ProcessingError>
where
    R: JobReader + JobWriter + UserReader + UserWriter,
{
    let mut stats = EmbeddingStats::default();
    let now = Utc::now().naive_utc();

    let jobs = repo.list_open_jobs()?;
    stats.jobs_loaded = jobs.len();
    for job in &jobs {
        match store_job_embedding(job, repo, generator, now) {
            Ok(_) => stats.job_embeddings_generated += 1,
            Err(error) => stats.record_failure(&format!("job {}", job.id), &error),
        }
    }

    let users = repo.list_users()?;
    stats.users_loaded = users.len();
    for user in &users {
        match store_user_embedding(user, repo, generator, now) {
            Ok(_) => stats.user_embeddings_generated += 1,
            Err(error) => stats.record_failure(&format!("user {}", user.id), &error),
        }
    }

    Ok(stats)
}

/// Generate embeddings only for open jobs and users whose stored vector is
/// missing or unusable.
pub fn embed_missing_embeddings<R>(
    repo: &R,
    generator: &EmbeddingGenerator,
) -> Result<EmbeddingStats, ProcessingError>
where
    R: JobReader + JobWriter + UserReader + UserWriter,
{
    let mut stats = EmbeddingStats::default();
    let now = Utc::now().naive_utc();

    let jobs = repo.list_open_jobs()?;
    stats.jobs_loaded = jobs.len();
    for job in &jobs {
        let record = EmbeddableRecord::Job(job.record());
        let outcome =
            load_or_generate_embedding(job.embedding.as_deref(), &record, generator, |value| {
                repo.set_job_embedding(job.id, value, now)
            });
        match outcome {
            Ok((_, true)) => stats.job_embeddings_generated += 1,
            Ok((_, false)) => stats.reused += 1,
            Err(error) => stats.record_failure(&format!("job {}", job.id), &error),
        }
    }

    let users = repo.list_users()?;
    stats.users_loaded = users.len();
    for user in &users {
        let record = EmbeddableRecord::Profile(user.record());
        let outcome =
            load_or_generate_embedding(user.embedding.as_deref(), &record, generator, |value| {
                repo.set_user_embedding(user.id, value, now)
            });
        match outcome {
            Ok((_, true)) => stats.user_embeddings_generated += 1,
            Ok((_, false)) => stats.reused += 1,
            Err(error) => stats.record_failure(&format!("user {}", user.id), &error),
        }
    }

    Ok(stats)
}

fn log_stats(label: &str, stats: &EmbeddingStats) {
    log::info!(
        "Finished {label}: jobs_loaded={}, users_loaded={}, job_embeddings_generated={}, user_embeddings_generated={}, reused={}, skipped_empty={}, failed={}",
        stats.jobs_loaded,
        stats.users_loaded,
        stats.job_embeddings_generated,
        stats.user_embeddings_generated,
        stats.reused,
        stats.skipped_empty,
        stats.failed
    );
    if stats.failed > 0 {
        log::warn!("{label} had {} failed records", stats.failed);
    }
}

/// Handle a request to re-embed a single job.
pub async fn process_embed_job_message<R>(job_id: i32, repo: R, generator: &EmbeddingGenerator)
where
    R: JobReader + JobWriter,
{
    log::info!("Received EmbedJob for job {job_id}");

    match refresh_job_embedding(job_id, &repo, generator) {
        Ok(dimension) => {
            log::info!("Finished EmbedJob for job {job_id}: dimension={dimension}")
        }
        Err(error) => log::error!("EmbedJob failed for job {job_id}: {error}"),
    }
}

/// Handle a request to re-embed a single user profile.
pub async fn process_embed_user_message<R>(user_id: i32, repo: R, generator: &EmbeddingGenerator)
where
    R: UserReader + UserWriter,
{
    log::info!("Received EmbedUser for user {user_id}");

    match refresh_user_embedding(user_id, &repo, generator) {
        Ok(dimension) => {
            log::info!("Finished EmbedUser for user {user_id}: dimension={dimension}")
        }
        Err(error) => log::error!("EmbedUser failed for user {user_id}: {error}"),
    }
}

/// Handle a request to re-embed every open job and user.
pub async fn process_embed_all_message<R>(repo: R, generator: &EmbeddingGenerator)
where
    R: JobReader + JobWriter + UserReader + UserWriter,
{
    log::info!("Received EmbedAll");

    match refresh_all_embeddings(&repo, generator) {
        Ok(stats) => log_stats("EmbedAll", &stats),
        Err(error) => log::error!("EmbedAll failed: {error}"),
    }
}

/// Handle a request to fill in missing embeddings.
pub async fn process_embed_missing_message<R>(repo: R, generator: &EmbeddingGenerator)
where
    R: JobReader + JobWriter + UserReader + UserWriter,
{
    log::info!("Received EmbedMissing");

    match embed_missing_embeddings(&repo, generator) {
        Ok(stats) => log_stats("EmbedMissing", &stats),
        Err(error) => log::error!("EmbedMissing failed: {error}"),
    }
}
