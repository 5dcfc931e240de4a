//! Keyword-presence encoder used when no embedding model is available.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dimension of keyword fallback vectors.
pub const FALLBACK_DIMENSION: usize = 100;

/// Upper bound of the jitter added to present keywords.
const JITTER: f32 = 0.1;

/// One dimension per keyword, matched as a case-insensitive substring.
const KEYWORDS: [&str; FALLBACK_DIMENSION] = [
    "python",
    "javascript",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "git",
    "machine learning",
    "data science",
    "web development",
    "frontend",
    "backend",
    "full stack",
    "devops",
    "mobile",
    "ios",
    "android",
    "ui",
    "ux",
    "design",
    "product manager",
    "project manager",
    "business analyst",
    "qa",
    "testing",
    "agile",
    "scrum",
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "critical thinking",
    "creativity",
    "innovation",
    "strategy",
    "planning",
    "marketing",
    "sales",
    "customer service",
    "support",
    "accounting",
    "finance",
    "hr",
    "recruiting",
    "training",
    "coaching",
    "mentoring",
    "research",
    "analysis",
    "statistics",
    "mathematics",
    "engineering",
    "architecture",
    "security",
    "networking",
    "cloud",
    "database",
    "api",
    "microservices",
    "java",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "typescript",
    "html",
    "css",
    "sass",
    "webpack",
    "babel",
    "eslint",
    "jest",
    "cypress",
    "selenium",
    "jenkins",
    "travis",
    "github",
    "gitlab",
    "linux",
    "windows",
    "macos",
    "ubuntu",
    "centos",
    "debian",
    "redhat",
    "rust",
    "golang",
    "kubernetes",
    "terraform",
    "postgresql",
    "mongodb",
    "graphql",
    "django",
    "fastapi",
    "flask",
    "angular",
    "vue",
];

/// Seed derived from the text so equal texts get equal jitter.
fn jitter_seed(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Encode `text` as keyword presence flags.
///
/// Present keywords get `1.0` plus a jitter in `[0, 0.1)`; absent ones stay
/// `0.0`. A text with no known keyword yields the zero vector.
pub fn keyword_embedding(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    let mut rng = StdRng::seed_from_u64(jitter_seed(&text));
    let mut embedding = vec![0.0_f32; FALLBACK_DIMENSION];

    for (slot, keyword) in embedding.iter_mut().zip(KEYWORDS.iter()) {
        if text.contains(keyword) {
            *slot = 1.0 + rng.random::<f32>() * JITTER;
        }
    }

    embedding
}

/// Keyword encoding resized to `dimension`.
///
/// Used when a loaded model fails on a single call, so the vector still has
/// the model's length. Extra slots are zero; keywords past `dimension` are
/// dropped.
pub fn keyword_embedding_with_dimension(text: &str, dimension: usize) -> Vec<f32> {
    let mut embedding = keyword_embedding(text);
    embedding.resize(dimension, 0.0);
    embedding
}
