//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{LecternError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
    max_concurrent: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder with the default model.
    pub fn new() -> Result<Self> {
        Self::with_config("text-embedding-3-small", 1536)
    }

    /// Create an embedder with a custom model and dimensions.
    pub fn with_config(model: &str, dimensions: usize) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            dimensions,
            batch_size: 100,
            max_concurrent: 2,
        })
    }

    /// Create an embedder from the `[embedding]` settings section.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self::with_config(&settings.model, settings.dimensions as usize)?
            .with_batching(settings.batch_size, settings.max_concurrent))
    }

    /// Set the request batch size and how many batches may be in flight.
    pub fn with_batching(mut self, batch_size: usize, max_concurrent: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    async fn embed_request(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(input))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| LecternError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| LecternError::OpenAI(format!("Embedding API error: {}", e)))?;

        // Sort by index to ensure correct order
        let mut data: Vec<_> = response.data.into_iter().collect();
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| LecternError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // `buffered` keeps batch order while letting requests overlap.
        let batches: Vec<Vec<Vec<f32>>> = stream::iter(texts.chunks(self.batch_size).map(<[String]>::to_vec))
            .map(|batch: Vec<String>| self.embed_request(batch))
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let embeddings: Vec<Vec<f32>> = batches.into_iter().flatten().collect();
        if embeddings.len() != texts.len() {
            return Err(LecternError::Embedding(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                embeddings.len()
            )));
        }

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
