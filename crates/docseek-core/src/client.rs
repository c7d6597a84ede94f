use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::AppConfig;
use crate::error::Result;
use crate::importer::{DocumentImporter, LocalFileImporter};
use crate::provider::{ModelProvider, build_provider};
use crate::store::{VectorStore, open_store};

mod catalog_service;
mod indexing_service;
mod search_service;

/// Engine facade: one store, one provider and one importer behind every
/// index and search call.
#[derive(Clone)]
pub struct DocSeek {
    store: Arc<dyn VectorStore>,
    provider: Arc<dyn ModelProvider>,
    importer: Arc<dyn DocumentImporter>,
    config: AppConfig,
}

impl std::fmt::Debug for DocSeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocSeek")
            .field("store", &self.store.backend())
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl DocSeek {
    pub fn new(
        store: Arc<dyn VectorStore>,
        provider: Arc<dyn ModelProvider>,
        importer: Arc<dyn DocumentImporter>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            provider,
            importer,
            config,
        }
    }

    /// Opens the configured store under `root_dir` with the configured
    /// provider and the bundled local importer.
    pub fn open(root_dir: &Path, config: AppConfig) -> Result<Self> {
        std::fs::create_dir_all(root_dir)?;
        let store = open_store(root_dir, &config.store)?;
        let provider = build_provider(&config.provider)?;
        debug!(
            root = %root_dir.display(),
            store = store.backend(),
            provider = provider.name(),
            "opened docseek"
        );
        let importer = Arc::new(LocalFileImporter::new(config.indexing.max_text_chars));
        Ok(Self::new(store, provider, importer, config))
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests;
