use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{DocseekError, Result};

/// Cloneable abort flag checked between files during a scan and between
/// documents during ranking.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(DocseekError::Cancelled);
        }
        Ok(())
    }
}
