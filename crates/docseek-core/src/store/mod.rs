use std::path::Path;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::{DocseekError, Result};
use crate::models::IndexedDocument;

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

/// Durable `path -> document` record. Every implementation serializes its
/// mutations through a single lock, so one `put` is atomic per path.
pub trait VectorStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Inserts or replaces the record for `document.path`. When the path is
    /// already stored its original `id` is kept; the stored record is returned.
    fn put(&self, document: IndexedDocument) -> Result<IndexedDocument>;

    /// Up to `limit` records, most recently indexed first.
    fn get_all(&self, limit: usize) -> Result<Vec<IndexedDocument>>;

    fn get_by_path(&self, path: &str) -> Result<Option<IndexedDocument>>;

    fn delete(&self, path: &str) -> Result<bool>;

    fn count(&self) -> Result<usize>;

    fn paths(&self) -> Result<Vec<String>>;
}

pub fn open_store(root: &Path, config: &StoreConfig) -> Result<Arc<dyn VectorStore>> {
    match config.backend {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteVectorStore::open(
            root.join(&config.file_name),
        )?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryVectorStore::new())),
    }
}

pub(crate) fn validate_document(document: &IndexedDocument) -> Result<()> {
    if document.path.trim().is_empty() {
        return Err(DocseekError::Validation(
            "document path must not be empty".to_string(),
        ));
    }
    if document.embedding.is_empty() {
        return Err(DocseekError::Validation(format!(
            "document embedding must not be empty: {}",
            document.path
        )));
    }
    Ok(())
}
