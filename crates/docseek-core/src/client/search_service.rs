use std::time::Instant;

use tracing::info;

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::models::FileSearchResult;
use crate::ranking::HybridRanker;

use super::DocSeek;

impl DocSeek {
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<FileSearchResult>> {
        self.search_with_cancel(query, limit, &CancellationToken::new())
    }

    /// Ranks a snapshot of the store taken when the call starts; writes that
    /// land during ranking are not seen.
    pub fn search_with_cancel(
        &self,
        query: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileSearchResult>> {
        let started = Instant::now();
        let snapshot = self.store.get_all(usize::MAX)?;
        let results = HybridRanker::new(self.provider.as_ref(), &self.config)
            .rank(query, &snapshot, limit, cancel)?;
        info!(
            candidates = snapshot.len(),
            results = results.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "search finished"
        );
        Ok(results)
    }
}
