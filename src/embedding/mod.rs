//! Embedding generation for job postings and user profiles.
//!
//! Records are projected onto a labelled text (see [`prompt`]) and encoded by a
//! [`TextEmbedder`]. The model is loaded lazily on first use; when loading
//! fails, or an individual call fails, the keyword encoder in [`keyword`]
//! takes over so callers always receive a vector of
//! [`EmbeddingGenerator::get_embedding_dimension`] length.

use std::sync::OnceLock;

use thiserror::Error;

use crate::domain::{EmbeddableRecord, JobRecord, ProfileRecord};
use crate::models::config::EmbeddingSettings;

pub mod codec;
pub mod keyword;
pub mod model;
pub mod prompt;

pub use codec::{decode_embedding, encode_embedding, parse_embedding};
pub use keyword::{FALLBACK_DIMENSION, keyword_embedding, keyword_embedding_with_dimension};
pub use model::FastEmbedModel;
pub use prompt::{job_embedding_prompt, record_embedding_prompt, user_embedding_prompt};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding model is disabled")]
    Disabled,
    #[error("unknown embedding model: {0}")]
    UnknownModel(String),
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),
    #[error("failed to generate embedding: {0}")]
    Inference(String),
    #[error("embedding model lock poisoned")]
    Poisoned,
    #[error("record has no text to embed")]
    EmptyRecord,
}

/// A sentence-embedding model: one string in, one fixed-length vector out.
pub trait TextEmbedder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

type ModelLoader = Box<dyn Fn() -> Result<Box<dyn TextEmbedder>, EmbeddingError> + Send + Sync>;

/// Normalize a vector to unit length.
///
/// Returns the original vector when the norm is zero.
pub fn normalize_embedding(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        vec.to_vec()
    } else {
        vec.iter().map(|x| x / norm).collect()
    }
}

/// Turns records into embeddings using a lazily loaded model.
pub struct EmbeddingGenerator {
    loader: ModelLoader,
    model: OnceLock<Option<Box<dyn TextEmbedder>>>,
}

impl EmbeddingGenerator {
    /// Create a generator whose model is built by `loader` on first use.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Box<dyn TextEmbedder>, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            model: OnceLock::new(),
        }
    }

    /// Create a generator around an already loaded model.
    pub fn with_model<M>(model: M) -> Self
    where
        M: TextEmbedder + 'static,
    {
        let model: Box<dyn TextEmbedder> = Box::new(model);
        Self {
            loader: Box::new(|| Err(EmbeddingError::Disabled)),
            model: OnceLock::from(Some(model)),
        }
    }

    /// Create a generator that only uses the keyword encoder.
    pub fn fallback_only() -> Self {
        Self::new(|| Err(EmbeddingError::Disabled))
    }

    /// Create a generator for the configured fastembed model.
    pub fn from_settings(settings: &EmbeddingSettings) -> Self {
        if !settings.enabled {
            log::warn!("Embedding model disabled by configuration; using keyword fallback");
            return Self::fallback_only();
        }

        let settings = settings.clone();
        Self::new(move || {
            FastEmbedModel::try_new(&settings).map(|model| Box::new(model) as Box<dyn TextEmbedder>)
        })
    }

    fn model(&self) -> Option<&dyn TextEmbedder> {
        self.model
            .get_or_init(|| match (self.loader)() {
                Ok(model) => Some(model),
                Err(error) => {
                    log::warn!("Embedding model unavailable, using keyword fallback: {error}");
                    None
                }
            })
            .as_deref()
    }

    /// True when embeddings come from the keyword encoder.
    pub fn is_fallback(&self) -> bool {
        self.model().is_none()
    }

    /// Length of the vectors produced by the active model or the fallback.
    pub fn get_embedding_dimension(&self) -> usize {
        self.model()
            .map(|model| model.dimension())
            .unwrap_or(FALLBACK_DIMENSION)
    }

    /// Embed free text such as a search query.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyRecord);
        }

        let Some(model) = self.model() else {
            return Ok(keyword_embedding(text));
        };

        match model.embed(text) {
            Ok(embedding) if !embedding.is_empty() => Ok(normalize_embedding(&embedding)),
            Ok(_) => {
                log::error!(
                    "Model {} returned an empty embedding; using keyword fallback",
                    model.name()
                );
                Ok(keyword_embedding_with_dimension(text, model.dimension()))
            }
            Err(error) => {
                log::error!(
                    "Model {} failed to embed text, using keyword fallback: {error}",
                    model.name()
                );
                Ok(keyword_embedding_with_dimension(text, model.dimension()))
            }
        }
    }

    pub fn embed(&self, record: &EmbeddableRecord) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_text(&record_embedding_prompt(record))
    }

    pub fn embed_job(&self, job: &JobRecord) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_text(&job_embedding_prompt(job))
    }

    pub fn embed_user(&self, profile: &ProfileRecord) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_text(&user_embedding_prompt(profile))
    }
}
