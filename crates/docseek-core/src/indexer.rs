use std::path::{Path, PathBuf};

use chrono::Utc;
use globset::GlobSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::config::AppConfig;
use crate::embedding::{EmbeddingSource, fallback_vector};
use crate::error::{DocseekError, Result};
use crate::importer::{DocumentImporter, file_modified_at};
use crate::models::{IndexReport, IndexedDocument};
use crate::provider::ModelProvider;
use crate::store::VectorStore;
use crate::text::clip_chars;

/// Incremental folder scanner. Files are visited in file-name order and
/// each one is written independently, so an interrupted scan leaves every
/// finished record intact.
pub struct Indexer<'a> {
    store: &'a dyn VectorStore,
    importer: &'a dyn DocumentImporter,
    provider: &'a dyn ModelProvider,
    config: &'a AppConfig,
}

enum FileOutcome {
    Indexed { fallback: bool },
    Unchanged,
    Unsupported,
    Failed,
}

impl<'a> Indexer<'a> {
    pub fn new(
        store: &'a dyn VectorStore,
        importer: &'a dyn DocumentImporter,
        provider: &'a dyn ModelProvider,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            store,
            importer,
            provider,
            config,
        }
    }

    pub fn index_folder(&self, root: &Path, cancel: &CancellationToken) -> Result<IndexReport> {
        let root = std::path::absolute(root)?;
        let mut report = IndexReport {
            root: root.display().to_string(),
            ..IndexReport::default()
        };

        if !root.is_dir() {
            if self.config.indexing.strict_root {
                return Err(DocseekError::NotFound(format!(
                    "index root is not a directory: {}",
                    root.display()
                )));
            }
            warn!(root = %root.display(), "index root missing, nothing to scan");
            return Ok(report);
        }

        let exclude = self.config.indexing.exclude_set()?;
        for path in self.candidates(&root, &exclude) {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            match self.index_file(&path) {
                FileOutcome::Indexed { fallback } => {
                    report.indexed += 1;
                    if fallback {
                        report.fallback_embeddings += 1;
                    }
                }
                FileOutcome::Unchanged => report.unchanged += 1,
                FileOutcome::Unsupported => report.unsupported += 1,
                FileOutcome::Failed => report.failed += 1,
            }
        }

        info!(
            root = %report.root,
            indexed = report.indexed,
            unchanged = report.unchanged,
            unsupported = report.unsupported,
            failed = report.failed,
            fallback_embeddings = report.fallback_embeddings,
            cancelled = report.cancelled,
            "folder scan finished"
        );
        Ok(report)
    }

    fn candidates<'w>(
        &'w self,
        root: &'w Path,
        exclude: &'w GlobSet,
    ) -> impl Iterator<Item = PathBuf> + 'w {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let Ok(relative) = entry.path().strip_prefix(root) else {
                    return true;
                };
                !excluded(exclude, relative, entry.file_type().is_dir())
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.config.indexing.is_supported(entry.path()))
            .map(walkdir::DirEntry::into_path)
    }

    fn index_file(&self, path: &Path) -> FileOutcome {
        let Some(key) = path.to_str().map(str::to_owned) else {
            warn!(path = %path.display(), "path is not valid UTF-8, skipping");
            return FileOutcome::Failed;
        };
        let existing = match self.store.get_by_path(&key) {
            Ok(existing) => existing,
            Err(err) => {
                warn!(path = %key, error = %err, "store lookup failed");
                return FileOutcome::Failed;
            }
        };

        let observed = file_modified_at(path);
        if let Some(existing) = &existing
            && let (Some(stored), Some(current)) = (existing.last_modified, observed)
            && stored >= current
        {
            debug!(path = %key, "unchanged since last index");
            return FileOutcome::Unchanged;
        }

        let imported = match self.importer.import(path) {
            Ok(imported) => imported,
            Err(DocseekError::Unsupported(reason)) => {
                debug!(path = %key, reason = %reason, "no text extractor");
                return FileOutcome::Unsupported;
            }
            Err(err) => {
                warn!(path = %key, error = %err, "import failed");
                return FileOutcome::Failed;
            }
        };

        let extracted_text = clip_chars(&imported.extracted_text, self.config.indexing.max_text_chars);
        let embed_input = if extracted_text.trim().is_empty() {
            imported.title.as_str()
        } else {
            extracted_text.as_str()
        };
        let (embedding, embedding_source) = self.embed(&key, embed_input);

        let document = IndexedDocument {
            id: existing
                .map(|doc| doc.id)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            title: imported.title,
            path: key.clone(),
            embedding,
            embedding_source,
            extracted_text,
            last_modified: observed.or(imported.last_modified),
            last_indexed: Utc::now(),
        };

        match self.store.put(document) {
            Ok(stored) => {
                debug!(path = %key, id = %stored.id, source = stored.embedding_source.as_str(), "indexed");
                FileOutcome::Indexed {
                    fallback: embedding_source == EmbeddingSource::Fallback,
                }
            }
            Err(err) => {
                warn!(path = %key, error = %err, "store write failed");
                FileOutcome::Failed
            }
        }
    }

    fn embed(&self, key: &str, text: &str) -> (Vec<f32>, EmbeddingSource) {
        match self
            .provider
            .embed(text, &self.config.provider.embed_model)
        {
            Ok(vector) if !vector.is_empty() && vector.iter().all(|x| x.is_finite()) => {
                (vector, EmbeddingSource::Provider)
            }
            Ok(_) => {
                warn!(path = %key, "provider returned an unusable embedding, using fallback");
                (fallback_vector(text), EmbeddingSource::Fallback)
            }
            Err(err) => {
                debug!(path = %key, error = %err, "provider embedding failed, using fallback");
                (fallback_vector(text), EmbeddingSource::Fallback)
            }
        }
    }
}

/// Directories are probed with a trailing child so `**/name/**` prunes the
/// whole subtree instead of matching only the files below it.
fn excluded(exclude: &GlobSet, relative: &Path, is_dir: bool) -> bool {
    exclude.is_match(relative) || (is_dir && exclude.is_match(relative.join("_")))
}
