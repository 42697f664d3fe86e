//! Lectern - lecture transcript segmentation and hybrid reranking
//!
//! Turns raw lecture transcripts into retrieval-ready chunks and reorders
//! vector search candidates with auxiliary relevance signals.
//!
//! # Overview
//!
//! Lectern allows you to:
//! - Parse WebVTT transcripts into timed segments
//! - Detect where the lecture proper begins and trim the intro
//! - Pack segments into token-bounded, overlapping chunks
//! - Rerank search candidates by recency, metadata, code content and type
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `transcription` - Timestamps, WebVTT parsing, lecture-start detection
//! - `chunking` - Token estimation and semantic chunking
//! - `rerank` - Hybrid reranking of search candidates
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector store abstraction
//! - `pipeline` - Ingestion and search client
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern::config::Settings;
//! use lectern::pipeline::{Pipeline, TranscriptSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::with_openai(settings)?;
//!
//!     let raw = std::fs::read_to_string("lecture-01.vtt")?;
//!     let result = pipeline
//!         .ingest_transcript(TranscriptSource::new("lecture-01"), &raw)
//!         .await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     for hit in pipeline.search("how does recursion terminate", 5).await? {
//!         println!("{:.2} {}", hit.final_score, hit.result.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod pipeline;
pub mod rerank;
pub mod transcription;
pub mod vector_store;

pub use error::{LecternError, Result};
