use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: String,
    pub title: String,
    pub path: String,
    #[serde(skip_serializing, default)]
    pub embedding: Vec<f32>,
    pub embedding_source: EmbeddingSource,
    #[serde(skip_serializing, default)]
    pub extracted_text: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub last_indexed: DateTime<Utc>,
}

impl IndexedDocument {
    /// Lowercased extension of `path`, empty when there is none.
    #[must_use]
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub semantic: f32,
    pub lexical: f32,
    pub category: f32,
    pub quality: f32,
    pub required_terms_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSearchResult {
    pub document: IndexedDocument,
    pub snippet: String,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryIntent {
    pub normalized_query: String,
    pub content_terms: Vec<String>,
    pub required_terms: Vec<String>,
    pub prefers_documents: bool,
    pub prefers_images: bool,
    pub is_resume_query: bool,
}

impl QueryIntent {
    #[must_use]
    pub const fn has_type_preference(&self) -> bool {
        self.prefers_documents || self.prefers_images
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub root: String,
    pub indexed: usize,
    pub unchanged: usize,
    pub unsupported: usize,
    pub failed: usize,
    pub fallback_embeddings: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub backend: String,
    pub documents: usize,
    pub provider: String,
    pub embed_model: String,
}
