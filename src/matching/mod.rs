//! Cosine-similarity scoring and ranking of embeddings.

use serde::Serialize;

use crate::domain::{JobRecord, ProfileRecord};
use crate::embedding::EmbeddingGenerator;

/// Cosine similarity of two embeddings, clamped to `[0, 1]`.
///
/// Empty, zero-norm or differently sized vectors score 0.0.
pub fn calculate_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.len() != b.len() {
        log::debug!(
            "Embedding dimension mismatch ({} vs {}); scoring 0.0",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_nan() {
        return 0.0;
    }
    similarity.clamp(0.0, 1.0)
}

/// Round a score to three decimals for display and persistence.
pub fn round_score(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}

/// Cutoff and result size applied by a matching call site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchPolicy {
    pub threshold: f32,
    pub top_k: usize,
}

impl MatchPolicy {
    pub fn new(threshold: f32, top_k: usize) -> Self {
        Self { threshold, top_k }
    }

    /// Keep every scored candidate up to `top_k`.
    pub fn unfiltered(top_k: usize) -> Self {
        Self::new(0.0, top_k)
    }
}

/// A scored candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult<K> {
    pub candidate: K,
    pub score: f32,
    pub meets_threshold: bool,
}

/// Score `candidates` against `query`, best first.
///
/// Equal scores keep their input order. At most `policy.top_k` results are
/// returned; results below `policy.threshold` are flagged but not removed,
/// see [`accepted`].
pub fn rank_candidates<K, V, I>(
    query: &[f32],
    candidates: I,
    policy: &MatchPolicy,
) -> Vec<MatchResult<K>>
where
    I: IntoIterator<Item = (K, V)>,
    V: AsRef<[f32]>,
{
    let mut results: Vec<MatchResult<K>> = candidates
        .into_iter()
        .map(|(candidate, embedding)| {
            let score = calculate_similarity(query, embedding.as_ref());
            MatchResult {
                candidate,
                score,
                meets_threshold: score >= policy.threshold,
            }
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(policy.top_k);
    results
}

/// Drop results below the policy threshold.
pub fn accepted<K>(results: Vec<MatchResult<K>>) -> Vec<MatchResult<K>> {
    results
        .into_iter()
        .filter(|result| result.meets_threshold)
        .collect()
}

/// Embeds records on the fly and ranks them against a profile.
pub struct Matcher<'a> {
    generator: &'a EmbeddingGenerator,
}

impl<'a> Matcher<'a> {
    pub fn new(generator: &'a EmbeddingGenerator) -> Self {
        Self { generator }
    }

    pub fn calculate_similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        calculate_similarity(a, b)
    }

    /// Rank job `candidates` for `profile`.
    ///
    /// The profile is embedded once. Candidates that cannot be embedded are
    /// skipped; an unembeddable profile yields no results.
    pub fn find_best_matches<K>(
        &self,
        profile: &ProfileRecord,
        candidates: &[(K, JobRecord)],
        policy: &MatchPolicy,
    ) -> Vec<MatchResult<K>>
    where
        K: Clone,
    {
        let profile_embedding = match self.generator.embed_user(profile) {
            Ok(embedding) => embedding,
            Err(error) => {
                log::warn!("Cannot embed profile for matching: {error}");
                return Vec::new();
            }
        };

        let scored = candidates.iter().filter_map(|(key, job)| {
            match self.generator.embed_job(job) {
                Ok(embedding) => Some((key.clone(), embedding)),
                Err(error) => {
                    log::warn!("Skipping candidate that cannot be embedded: {error}");
                    None
                }
            }
        });

        rank_candidates(&profile_embedding, scored, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingError, TextEmbedder};

    struct TokenEmbedder;

    impl TextEmbedder for TokenEmbedder {
        fn name(&self) -> &str {
            "tokens"
        }

        fn dimension(&self) -> usize {
            8
        }

        // One dimension per known token.
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let tokens = [
                "python", "fastapi", "developer", "muralist", "spray", "paint", "design", "skills",
            ];
            let text = text.to_lowercase();
            Ok(tokens
                .iter()
                .map(|token| text.matches(token).count() as f32)
                .collect())
        }
    }

    #[test]
    fn self_similarity_is_one() {
        let a = [0.3_f32, -0.2, 0.9];
        assert!((calculate_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = [0.3_f32, 0.2, 0.9];
        let b = [0.1_f32, 0.7, 0.4];
        assert_eq!(calculate_similarity(&a, &b), calculate_similarity(&b, &a));
    }

    #[test]
    fn degenerate_vectors_score_zero() {
        assert_eq!(calculate_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(calculate_similarity(&[], &[]), 0.0);
        assert_eq!(calculate_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[test]
    fn negative_cosine_is_floored() {
        assert_eq!(calculate_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn round_score_keeps_three_decimals() {
        assert_eq!(round_score(0.87654), 0.877);
    }

    #[test]
    fn ranking_is_descending_stable_and_truncated() {
        let query = [1.0_f32, 0.0];
        let candidates = vec![
            ("low", vec![0.0_f32, 1.0]),
            ("tie-a", vec![1.0_f32, 1.0]),
            ("best", vec![1.0_f32, 0.0]),
            ("tie-b", vec![2.0_f32, 2.0]),
        ];

        let results = rank_candidates(&query, candidates, &MatchPolicy::unfiltered(3));

        let order: Vec<_> = results.iter().map(|result| result.candidate).collect();
        assert_eq!(order, vec!["best", "tie-a", "tie-b"]);
        assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn threshold_flags_results_and_accepted_drops_them() {
        let query = [1.0_f32, 0.0];
        let candidates = vec![(1, vec![1.0_f32, 0.0]), (2, vec![0.2_f32, 1.0])];

        let results = rank_candidates(&query, candidates, &MatchPolicy::new(0.4, 10));

        assert_eq!(results.len(), 2);
        assert!(results[0].meets_threshold);
        assert!(!results[1].meets_threshold);
        let kept = accepted(results);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].candidate, 1);
    }

    #[test]
    fn python_profile_prefers_python_job() {
        let generator = EmbeddingGenerator::with_model(TokenEmbedder);
        let matcher = Matcher::new(&generator);
        let profile = ProfileRecord {
            skills: Some("Python, FastAPI".to_string()),
            primary_role: Some("talent".to_string()),
            ..Default::default()
        };
        let jobs = vec![
            (
                "B",
                JobRecord {
                    title: Some("Muralist".to_string()),
                    skills_required: Some("spray paint, design".to_string()),
                    ..Default::default()
                },
            ),
            (
                "A",
                JobRecord {
                    title: Some("Python Developer".to_string()),
                    skills_required: Some("Python, FastAPI".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let results = matcher.find_best_matches(&profile, &jobs, &MatchPolicy::unfiltered(10));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate, "A");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn python_profile_prefers_python_job_with_keyword_fallback() {
        let generator = EmbeddingGenerator::fallback_only();
        let matcher = Matcher::new(&generator);
        let profile = ProfileRecord {
            skills: Some("Python, FastAPI".to_string()),
            primary_role: Some("talent".to_string()),
            ..Default::default()
        };
        let jobs = vec![
            (
                1,
                JobRecord {
                    title: Some("Muralist".to_string()),
                    skills_required: Some("spray paint, design".to_string()),
                    ..Default::default()
                },
            ),
            (
                2,
                JobRecord {
                    title: Some("Python Developer".to_string()),
                    skills_required: Some("Python, FastAPI".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let results = matcher.find_best_matches(&profile, &jobs, &MatchPolicy::unfiltered(10));

        assert_eq!(results[0].candidate, 2);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn empty_candidate_list_yields_no_matches() {
        let generator = EmbeddingGenerator::with_model(TokenEmbedder);
        let matcher = Matcher::new(&generator);
        let profile = ProfileRecord {
            skills: Some("Python".to_string()),
            ..Default::default()
        };
        let jobs: Vec<(i32, JobRecord)> = Vec::new();

        assert!(
            matcher
                .find_best_matches(&profile, &jobs, &MatchPolicy::unfiltered(5))
                .is_empty()
        );
    }

    #[test]
    fn unembeddable_candidates_are_skipped() {
        let generator = EmbeddingGenerator::with_model(TokenEmbedder);
        let matcher = Matcher::new(&generator);
        let profile = ProfileRecord {
            skills: Some("Python".to_string()),
            ..Default::default()
        };
        let jobs = vec![
            (1, JobRecord::default()),
            (
                2,
                JobRecord {
                    title: Some("Python Developer".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let results = matcher.find_best_matches(&profile, &jobs, &MatchPolicy::unfiltered(5));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].candidate, 2);
    }

    #[test]
    fn unembeddable_profile_yields_no_matches() {
        let generator = EmbeddingGenerator::with_model(TokenEmbedder);
        let matcher = Matcher::new(&generator);
        let jobs = vec![(
            1,
            JobRecord {
                title: Some("Python Developer".to_string()),
                ..Default::default()
            },
        )];

        assert!(
            matcher
                .find_best_matches(&ProfileRecord::default(), &jobs, &MatchPolicy::unfiltered(5))
                .is_empty()
        );
    }
}
