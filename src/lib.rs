pub mod db;
pub mod domain;
pub mod embedding;
pub mod matching;
pub mod models;
pub mod processing;
pub mod repository;
pub mod scheduler;
pub mod schema;

/// Default cosine-similarity cutoff for job recommendations.
pub const RECOMMENDATION_THRESHOLD: f32 = 0.4;

/// Default minimum score for semantic job search results.
pub const DEFAULT_SEARCH_MIN_SCORE: f32 = 0.1;
