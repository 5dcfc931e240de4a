//! Configuration model loaded from external sources.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::matching::MatchPolicy;
use crate::{DEFAULT_SEARCH_MIN_SCORE, RECOMMENDATION_THRESHOLD};

const DEFAULT_CONFIG_PATH: &str = "config/default";
const ENV_PREFIX: &str = "PROLINQ";

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the worker, the scheduler and the processing handlers.
pub struct ServerConfig {
    pub database_url: String,
    pub zmq_address: String,
    pub embedding: EmbeddingSettings,
    pub matching: MatchingSettings,
    pub scheduler: SchedulerSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingSettings {
    /// When false the keyword fallback encoder is used without loading a model.
    pub enabled: bool,
    /// fastembed model name, e.g. `AllMiniLML6V2`.
    pub model: String,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
/// Similarity cutoffs and result sizes for every matching call site.
pub struct MatchingSettings {
    pub recommendation_threshold: f32,
    pub daily_limit: usize,
    pub refresh_limit: usize,
    pub digest_limit: usize,
    pub search_min_score: f32,
    pub search_limit: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SchedulerSettings {
    pub enabled: bool,
    pub daily_hour_utc: u32,
}

impl MatchingSettings {
    /// Policy for the once-a-day recommendation batch and the daily view.
    pub fn daily_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.recommendation_threshold, self.daily_limit)
    }

    /// Policy for forced refreshes.
    pub fn refresh_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.recommendation_threshold, self.refresh_limit)
    }

    /// Policy for the jobs listed in the daily email digest.
    pub fn digest_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.recommendation_threshold, self.digest_limit)
    }

    /// Policy for semantic search with the default cutoff and size.
    pub fn search_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.search_min_score, self.search_limit)
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            recommendation_threshold: RECOMMENDATION_THRESHOLD,
            daily_limit: 5,
            refresh_limit: 10,
            digest_limit: 3,
            search_min_score: DEFAULT_SEARCH_MIN_SCORE,
            search_limit: 10,
        }
    }
}

type DefaultBuilder = config::ConfigBuilder<config::builder::DefaultState>;

fn builder_with_defaults() -> Result<DefaultBuilder, ConfigError> {
    let matching = MatchingSettings::default();
    Config::builder()
        .set_default("database_url", "prolinq.db")?
        .set_default("zmq_address", "tcp://127.0.0.1:5556")?
        .set_default("embedding.enabled", true)?
        .set_default("embedding.model", "AllMiniLML6V2")?
        .set_default(
            "matching.recommendation_threshold",
            f64::from(matching.recommendation_threshold),
        )?
        .set_default("matching.daily_limit", matching.daily_limit as i64)?
        .set_default("matching.refresh_limit", matching.refresh_limit as i64)?
        .set_default("matching.digest_limit", matching.digest_limit as i64)?
        .set_default(
            "matching.search_min_score",
            f64::from(matching.search_min_score),
        )?
        .set_default("matching.search_limit", matching.search_limit as i64)?
        .set_default("scheduler.enabled", true)?
        .set_default("scheduler.daily_hour_utc", 9_i64)
}

impl ServerConfig {
    /// Load defaults, then `config/default.yaml` when present, then
    /// `PROLINQ__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        builder_with_defaults()?
            .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load defaults overridden by a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        builder_with_defaults()?
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_overrides() {
        let config = ServerConfig::from_yaml("{}").expect("config should load");

        assert_eq!(config.database_url, "prolinq.db");
        assert!(config.embedding.enabled);
        assert_eq!(config.embedding.model, "AllMiniLML6V2");
        assert!(config.embedding.cache_dir.is_none());
        assert!((config.matching.recommendation_threshold - 0.4).abs() < 1e-6);
        assert_eq!(config.matching.daily_limit, 5);
        assert_eq!(config.matching.refresh_limit, 10);
        assert_eq!(config.matching.digest_limit, 3);
        assert_eq!(config.scheduler.daily_hour_utc, 9);
    }

    #[test]
    fn yaml_overrides_nested_settings() {
        let yaml = r#"
database_url: "/tmp/prolinq-test.db"
embedding:
  enabled: false
  cache_dir: "/var/cache/models"
matching:
  recommendation_threshold: 0.3
  daily_limit: 2
"#;
        let config = ServerConfig::from_yaml(yaml).expect("config should load");

        assert_eq!(config.database_url, "/tmp/prolinq-test.db");
        assert!(!config.embedding.enabled);
        assert_eq!(
            config.embedding.cache_dir,
            Some(PathBuf::from("/var/cache/models"))
        );
        let policy = config.matching.daily_policy();
        assert!((policy.threshold - 0.3).abs() < 1e-6);
        assert_eq!(policy.top_k, 2);
        assert_eq!(config.matching.refresh_policy().top_k, 10);
    }

    #[test]
    fn digest_and_search_policies_follow_settings() {
        let yaml = r#"
matching:
  recommendation_threshold: 0.5
  digest_limit: 4
  search_min_score: 0.2
  search_limit: 25
"#;
        let config = ServerConfig::from_yaml(yaml).expect("config should load");

        let digest = config.matching.digest_policy();
        assert!((digest.threshold - 0.5).abs() < 1e-6);
        assert_eq!(digest.top_k, 4);

        let search = config.matching.search_policy();
        assert!((search.threshold - 0.2).abs() < 1e-6);
        assert_eq!(search.top_k, 25);
    }
}
