//! In-memory vector store implementation.
//!
//! Useful for testing and small corpora.

use super::{cosine_similarity, StoredChunk, VectorStore};
use crate::error::{LecternError, Result};
use crate::rerank::SearchResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<Uuid, StoredChunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, StoredChunk>>> {
        self.records
            .read()
            .map_err(|_| LecternError::VectorStore("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, StoredChunk>>> {
        self.records
            .write()
            .map_err(|_| LecternError::VectorStore("store lock poisoned".to_string()))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, records: &[StoredChunk]) -> Result<usize> {
        let mut store = self.write()?;
        for record in records {
            store.insert(record.id, record.clone());
        }
        Ok(records.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let store = self.read()?;

        // Opposite vectors score zero rather than going negative.
        let mut scored: Vec<(f64, &StoredChunk)> = store
            .values()
            .map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding).max(0.0) as f64;
                (score, record)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.source_id.cmp(&b.1.source_id))
                .then_with(|| a.1.chunk_index.cmp(&b.1.chunk_index))
        });
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(score, record)| record.to_search_result(score))
            .collect())
    }

    async fn delete_by_source(&self, source_id: &str) -> Result<usize> {
        let mut store = self.write()?;
        let initial_len = store.len();
        store.retain(|_, record| record.source_id != source_id);
        Ok(initial_len - store.len())
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }
}
