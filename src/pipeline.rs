//! Ingestion and search client for Lectern.
//!
//! Ties the segmentation pipeline and the reranker to the embedding and
//! vector store collaborators. The client is built and owned by the caller.

use crate::chunking::{analyze_chunks, ChunkAnalysis, SemanticChunker};
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{LecternError, Result};
use crate::rerank::{RerankedResult, Reranker, ResultMetadata};
use crate::transcription::{parse_vtt, LectureStartAnalysis, LectureStartDetector};
use crate::vector_store::{MemoryVectorStore, StoredChunk, VectorStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Candidates fetched per requested result, so reranking has room to reorder.
const CANDIDATE_MULTIPLIER: usize = 3;

/// Identity and metadata of a transcript being ingested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptSource {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl TranscriptSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// A document indexed alongside transcripts (repository, article, video...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalResource {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Outcome of ingesting one transcript.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub source_id: String,
    /// Segments parsed from the raw transcript.
    pub segments: usize,
    /// Lecture-start detection, when intro trimming is enabled.
    pub lecture_start: Option<LectureStartAnalysis>,
    pub chunks_indexed: usize,
    pub analysis: ChunkAnalysis,
}

/// The ingestion and search client.
pub struct Pipeline {
    settings: Settings,
    chunker: SemanticChunker,
    detector: LectureStartDetector,
    reranker: Reranker,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

impl Pipeline {
    /// Create a pipeline with custom components.
    pub fn new(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        let chunker = SemanticChunker::new(settings.chunking.to_config())?;
        let detector = LectureStartDetector::new(settings.detection.clone());
        let reranker = Reranker::new(settings.rerank.weights.clone(), settings.rerank.options());

        Ok(Self {
            settings,
            chunker,
            detector,
            reranker,
            embedder,
            vector_store,
        })
    }

    /// Create a pipeline backed by OpenAI embeddings and the in-memory store.
    pub fn with_openai(settings: Settings) -> Result<Self> {
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);
        Self::new(settings, embedder, Arc::new(MemoryVectorStore::new()))
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone()
    }

    /// Parse, trim, chunk, embed and index a WebVTT transcript.
    ///
    /// Re-ingesting a source replaces its previous records.
    #[instrument(skip(self, source, raw), fields(source_id = %source.id))]
    pub async fn ingest_transcript(
        &self,
        source: TranscriptSource,
        raw: &str,
    ) -> Result<IngestResult> {
        let segments = parse_vtt(raw)?;
        let segment_count = segments.len();

        let (lecture_start, body) = if self.settings.chunking.trim_intro {
            let analysis = self.detector.analyze(&segments);
            info!(
                "Lecture starts at segment {} ({} via {:?})",
                analysis.start_index, analysis.confidence, analysis.method
            );
            let start = analysis.start_index;
            (Some(analysis), &segments[start..])
        } else {
            (None, &segments[..])
        };

        let chunks = self.chunker.chunk(body);
        let analysis = analyze_chunks(&chunks);
        debug!("Created {} chunks from {} segments", chunks.len(), body.len());

        self.vector_store.delete_by_source(&source.id).await?;

        let chunks_indexed = if chunks.is_empty() {
            0
        } else {
            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            check_count(texts.len(), embeddings.len())?;

            let metadata = ResultMetadata {
                title: source.title.clone(),
                author: source.author.clone(),
                created_at: source.created_at,
                resource_type: None,
                url: source.url.clone(),
                extra: serde_json::Map::new(),
            };

            let records: Vec<StoredChunk> = chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| {
                    StoredChunk::from_chunk(&source.id, chunk, metadata.clone(), embedding)
                })
                .collect();

            self.vector_store.upsert_batch(&records).await?
        };

        info!("Indexed {} chunks for {}", chunks_indexed, source.id);

        Ok(IngestResult {
            source_id: source.id,
            segments: segment_count,
            lecture_start,
            chunks_indexed,
            analysis,
        })
    }

    /// Embed and index an external resource as a single candidate.
    #[instrument(skip(self, resource), fields(resource_id = %resource.id))]
    pub async fn ingest_resource(&self, resource: ExternalResource) -> Result<()> {
        if resource.content.trim().is_empty() {
            return Err(LecternError::InvalidInput(format!(
                "Resource '{}' has no content",
                resource.id
            )));
        }

        let embedding = self.embedder.embed(&resource.content).await?;
        let metadata = ResultMetadata {
            title: resource.title,
            author: resource.author,
            created_at: resource.created_at,
            resource_type: resource.resource_type,
            url: resource.url,
            extra: serde_json::Map::new(),
        };

        self.vector_store.delete_by_source(&resource.id).await?;
        let record = StoredChunk::resource(&resource.id, resource.content, metadata, embedding);
        self.vector_store.upsert_batch(&[record]).await?;
        Ok(())
    }

    /// Embed the query, fetch candidates and rerank them.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<RerankedResult>> {
        if query.trim().is_empty() {
            return Err(LecternError::InvalidInput("Search query is empty".to_string()));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let candidates = self
            .vector_store
            .search(&query_embedding, limit.saturating_mul(CANDIDATE_MULTIPLIER))
            .await?;
        debug!("Retrieved {} candidates", candidates.len());

        let mut ranked = self.reranker.rerank(candidates, query);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Remove everything from the vector store.
    pub async fn reset(&self) -> Result<()> {
        self.vector_store.clear().await?;
        info!("Vector store cleared");
        Ok(())
    }

    /// Shut the client down, releasing its collaborators.
    pub fn close(self) {
        debug!("Closing pipeline");
    }
}

fn check_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(LecternError::Embedding(format!(
            "Expected {} embeddings, received {}",
            expected, actual
        )));
    }
    Ok(())
}
