//! ONNX sentence-embedding model backed by fastembed.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::embedding::{EmbeddingError, TextEmbedder, normalize_embedding};
use crate::models::config::EmbeddingSettings;

/// Look up a supported fastembed model by variant name (`AllMiniLML6V2`) or
/// model code (`Qdrant/all-MiniLM-L6-v2-onnx`), returning it with its
/// output dimension.
pub fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), EmbeddingError> {
    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| info.model_code == name || format!("{:?}", info.model) == name)
        .map(|info| (info.model, info.dim))
        .ok_or_else(|| EmbeddingError::UnknownModel(name.to_string()))
}

/// fastembed model guarded by a mutex, since inference needs `&mut`.
pub struct FastEmbedModel {
    name: String,
    dimension: usize,
    inner: Mutex<TextEmbedding>,
}

impl FastEmbedModel {
    /// Load the configured model, downloading weights on first use.
    pub fn try_new(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let (model, dimension) = resolve_model(&settings.model)?;

        let mut options = InitOptions::new(model).with_show_download_progress(false);
        if let Some(cache_dir) = &settings.cache_dir {
            options = options.with_cache_dir(cache_dir.clone());
        }

        log::info!("Loading embedding model {}", settings.model);
        let embedder = TextEmbedding::try_new(options)
            .map_err(|error| EmbeddingError::ModelLoad(format!("{error:?}")))?;
        log::info!(
            "Embedding model {} loaded, dimension {dimension}",
            settings.model
        );

        Ok(Self {
            name: settings.model.clone(),
            dimension,
            inner: Mutex::new(embedder),
        })
    }
}

impl TextEmbedder for FastEmbedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embedder = self.inner.lock().map_err(|_| EmbeddingError::Poisoned)?;

        embedder
            .embed(vec![text], None)
            .map_err(|error| EmbeddingError::Inference(format!("{error:?}")))?
            .into_iter()
            .next()
            .map(|value| normalize_embedding(&value))
            .ok_or_else(|| EmbeddingError::Inference("model returned no embedding".to_string()))
    }
}
