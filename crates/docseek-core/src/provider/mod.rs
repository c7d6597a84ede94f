use std::sync::Arc;

use tracing::warn;

use crate::config::{ProviderConfig, ProviderKind};
use crate::error::{DocseekError, Result};

mod ollama;

pub use ollama::OllamaProvider;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 128,
        }
    }
}

/// Local model runtime that can embed text and complete prompts.
///
/// Both calls may fail at any time (runtime not started, model not pulled,
/// timeout). Callers treat every `Err` as "no answer" and substitute.
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>>;

    fn complete(&self, prompt: &str, model: &str, options: &CompletionOptions) -> Result<String>;
}

/// Provider that never answers. Every embedding falls back to the hashed
/// vectorizer and query expansion is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl ModelProvider for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn embed(&self, _text: &str, _model: &str) -> Result<Vec<f32>> {
        Err(DocseekError::Provider(
            "offline provider has no embedding model".to_string(),
        ))
    }

    fn complete(&self, _prompt: &str, _model: &str, _options: &CompletionOptions) -> Result<String> {
        Err(DocseekError::Provider(
            "offline provider has no completion model".to_string(),
        ))
    }
}

pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ModelProvider>> {
    match config.kind {
        ProviderKind::Offline => Ok(Arc::new(OfflineProvider)),
        ProviderKind::Ollama => match OllamaProvider::new(&config.endpoint, config.timeout_ms) {
            Ok(provider) => Ok(Arc::new(provider)),
            Err(err @ DocseekError::Validation(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "ollama client unavailable, running offline");
                Ok(Arc::new(OfflineProvider))
            }
        },
    }
}
