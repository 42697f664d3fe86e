//! Vector store abstraction for Lectern.
//!
//! Persistence and similarity search are collaborator concerns; the crate only
//! defines the interface and ships an in-memory backend.

mod memory;

pub use memory::MemoryVectorStore;

use crate::chunking::Chunk;
use crate::error::Result;
use crate::rerank::{ResultKind, ResultMetadata, SearchResult};
use crate::transcription::Timestamp;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk or resource stored with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique record ID.
    pub id: Uuid,
    /// Caller-supplied identifier of the transcript or resource.
    pub source_id: String,
    pub kind: ResultKind,
    pub text: String,
    /// Offsets within the source transcript, when it has any.
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Order of this record within its source.
    pub chunk_index: usize,
    /// Metadata handed back to the reranker at query time.
    pub metadata: ResultMetadata,
    pub embedding: Vec<f32>,
    pub indexed_at: DateTime<Utc>,
}

impl StoredChunk {
    /// Wrap a transcript chunk.
    pub fn from_chunk(
        source_id: &str,
        chunk: Chunk,
        metadata: ResultMetadata,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: source_id.to_string(),
            kind: ResultKind::PrimaryTranscript,
            text: chunk.text,
            start_time: Some(chunk.start_time),
            end_time: Some(chunk.end_time),
            chunk_index: chunk.metadata.chunk_index,
            metadata,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Wrap an external resource with no timing information.
    pub fn resource(
        source_id: &str,
        text: String,
        metadata: ResultMetadata,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: source_id.to_string(),
            kind: ResultKind::ExternalResource,
            text,
            start_time: None,
            end_time: None,
            chunk_index: 0,
            metadata,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Convert to a reranker candidate with the given similarity.
    pub fn to_search_result(&self, similarity: f64) -> SearchResult {
        let mut metadata = self.metadata.clone();
        metadata
            .extra
            .insert("source_id".to_string(), serde_json::Value::from(self.source_id.clone()));
        metadata
            .extra
            .insert("chunk_index".to_string(), serde_json::Value::from(self.chunk_index));
        if let Some(start) = self.start_time {
            metadata
                .extra
                .insert("start_time".to_string(), serde_json::Value::from(start.to_string()));
        }

        SearchResult {
            id: self.id.to_string(),
            kind: self.kind,
            text: self.text.clone(),
            similarity,
            metadata,
        }
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk upsert records.
    async fn upsert_batch(&self, records: &[StoredChunk]) -> Result<usize>;

    /// Most similar records, with similarity mapped into 0..1.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Delete records by source ID.
    async fn delete_by_source(&self, source_id: &str) -> Result<usize>;

    /// Get total record count.
    async fn document_count(&self) -> Result<usize>;

    /// Remove every record.
    async fn clear(&self) -> Result<()>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkMetadata;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[test]
    fn test_search_result_carries_location() {
        let chunk = Chunk {
            text: "Recursion needs a base case".to_string(),
            start_time: Timestamp::from_millis(125_000),
            end_time: Timestamp::from_millis(150_000),
            token_count: 7,
            metadata: ChunkMetadata {
                chunk_index: 3,
                has_overlap: true,
                below_min_tokens: true,
                truncated: false,
            },
        };
        let meta = ResultMetadata {
            title: Some("CS61A Lecture 4".to_string()),
            ..ResultMetadata::default()
        };
        let record = StoredChunk::from_chunk("cs61a-04", chunk, meta, vec![0.1, 0.2]);
        let result = record.to_search_result(0.8);

        assert_eq!(result.kind, ResultKind::PrimaryTranscript);
        assert_eq!(result.metadata.title.as_deref(), Some("CS61A Lecture 4"));
        assert_eq!(result.metadata.extra["start_time"], "00:02:05.000");
        assert_eq!(result.metadata.extra["chunk_index"], 3);
        assert_eq!(result.metadata.extra["source_id"], "cs61a-04");
    }
}
