use std::path::Path;

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::indexer::Indexer;
use crate::models::IndexReport;

use super::DocSeek;

impl DocSeek {
    pub fn index_folder(&self, root: &Path) -> Result<IndexReport> {
        self.index_folder_with_cancel(root, &CancellationToken::new())
    }

    pub fn index_folder_with_cancel(
        &self,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<IndexReport> {
        Indexer::new(
            self.store.as_ref(),
            self.importer.as_ref(),
            self.provider.as_ref(),
            &self.config,
        )
        .index_folder(root, cancel)
    }
}
