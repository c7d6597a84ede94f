use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::{IndexedDocument, StoreStatus};

use super::DocSeek;

impl DocSeek {
    pub fn documents(&self, limit: usize) -> Result<Vec<IndexedDocument>> {
        self.store.get_all(limit)
    }

    pub fn document(&self, path: &str) -> Result<Option<IndexedDocument>> {
        self.store.get_by_path(path)
    }

    pub fn remove(&self, path: &str) -> Result<bool> {
        let removed = self.store.delete(path)?;
        info!(path, removed, "remove document");
        Ok(removed)
    }

    /// Deletes every record whose source file no longer exists and returns
    /// the removed paths.
    pub fn prune_missing(&self) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for path in self.store.paths()? {
            if Path::new(&path).is_file() {
                continue;
            }
            if self.store.delete(&path)? {
                removed.push(path);
            }
        }
        info!(removed = removed.len(), "prune missing documents");
        Ok(removed)
    }

    pub fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            backend: self.store.backend().to_string(),
            documents: self.store.count()?,
            provider: self.provider.name().to_string(),
            embed_model: self.config.provider.embed_model.clone(),
        })
    }
}
