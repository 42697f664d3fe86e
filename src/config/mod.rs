//! Configuration module for Lectern.
//!
//! Handles loading, saving and editing application settings.

mod settings;

pub use settings::{ChunkingSettings, EmbeddingSettings, GeneralSettings, RerankSettings, Settings};
