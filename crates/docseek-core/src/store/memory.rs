use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{DocseekError, Result};
use crate::models::IndexedDocument;

use super::{VectorStore, validate_document};

#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    docs: Mutex<BTreeMap<String, IndexedDocument>>,
}

impl MemoryVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_docs<T>(&self, f: impl FnOnce(&mut BTreeMap<String, IndexedDocument>) -> T) -> Result<T> {
        let mut docs = self
            .docs
            .lock()
            .map_err(|_| DocseekError::Internal("memory store mutex poisoned".to_string()))?;
        Ok(f(&mut docs))
    }
}

impl VectorStore for MemoryVectorStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn put(&self, mut document: IndexedDocument) -> Result<IndexedDocument> {
        validate_document(&document)?;
        self.with_docs(|docs| {
            if let Some(existing) = docs.get(&document.path) {
                document.id = existing.id.clone();
            }
            docs.insert(document.path.clone(), document.clone());
            document
        })
    }

    fn get_all(&self, limit: usize) -> Result<Vec<IndexedDocument>> {
        self.with_docs(|docs| {
            let mut out = docs.values().cloned().collect::<Vec<_>>();
            out.sort_by(|a, b| {
                b.last_indexed
                    .cmp(&a.last_indexed)
                    .then_with(|| a.path.cmp(&b.path))
            });
            out.truncate(limit);
            out
        })
    }

    fn get_by_path(&self, path: &str) -> Result<Option<IndexedDocument>> {
        self.with_docs(|docs| docs.get(path).cloned())
    }

    fn delete(&self, path: &str) -> Result<bool> {
        self.with_docs(|docs| docs.remove(path).is_some())
    }

    fn count(&self) -> Result<usize> {
        self.with_docs(|docs| docs.len())
    }

    fn paths(&self) -> Result<Vec<String>> {
        self.with_docs(|docs| docs.keys().cloned().collect())
    }
}
