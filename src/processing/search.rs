use crate::domain::Job;
use crate::embedding::{EmbeddingGenerator, decode_embedding};
use crate::matching::{MatchPolicy, accepted, rank_candidates};
use crate::processing::ProcessingError;
use crate::repository::JobReader;

/// A job returned by semantic search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit {
    pub job: Job,
    pub similarity_score: f32,
}

/// Rank open jobs against a free-text query.
///
/// The query is embedded as-is. Only jobs with a stored vector scoring at
/// least `policy.threshold` are returned, best first, at most `policy.top_k`.
pub fn semantic_search<R>(
    query: &str,
    policy: &MatchPolicy,
    repo: &R,
    generator: &EmbeddingGenerator,
) -> Result<Vec<SearchHit>, ProcessingError>
where
    R: JobReader,
{
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let query_embedding = generator.embed_text(query)?;

    let candidates = repo.list_open_jobs()?.into_iter().filter_map(|job| {
        let embedding = decode_embedding(job.embedding.as_deref()?);
        if embedding.is_empty() {
            return None;
        }
        Some((job, embedding))
    });

    Ok(accepted(rank_candidates(&query_embedding, candidates, policy))
        .into_iter()
        .map(|result| SearchHit {
            job: result.candidate,
            similarity_score: result.score,
        })
        .collect())
}
