use serde::Deserialize;

use super::env::{read_env_u64, read_non_empty_env};

const ENV_PROVIDER: &str = "DOCSEEK_PROVIDER";
const ENV_OLLAMA_ENDPOINT: &str = "DOCSEEK_OLLAMA_ENDPOINT";
const ENV_EMBED_MODEL: &str = "DOCSEEK_EMBED_MODEL";
const ENV_COMPLETION_MODEL: &str = "DOCSEEK_COMPLETION_MODEL";
const ENV_PROVIDER_TIMEOUT_MS: &str = "DOCSEEK_PROVIDER_TIMEOUT_MS";

const DEFAULT_OLLAMA_ENDPOINT: &str = "http://127.0.0.1:11434";
const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";
const DEFAULT_COMPLETION_MODEL: &str = "llama3.2:3b";
const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 4_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    Offline,
}

impl ProviderKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Offline => "offline",
        }
    }
}

#[must_use]
pub fn resolve_provider_kind(raw: Option<&str>) -> ProviderKind {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if matches!(value.as_str(), "offline" | "none" | "off" | "fallback") => {
            ProviderKind::Offline
        }
        _ => ProviderKind::Ollama,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: String,
    pub embed_model: String,
    pub completion_model: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

impl ProviderConfig {
    pub(super) fn apply_env(&mut self) {
        if let Some(raw) = read_non_empty_env(ENV_PROVIDER) {
            self.kind = resolve_provider_kind(Some(&raw));
        }
        if let Some(endpoint) = read_non_empty_env(ENV_OLLAMA_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(model) = read_non_empty_env(ENV_EMBED_MODEL) {
            self.embed_model = model;
        }
        if let Some(model) = read_non_empty_env(ENV_COMPLETION_MODEL) {
            self.completion_model = model;
        }
        if let Some(timeout_ms) = read_env_u64(ENV_PROVIDER_TIMEOUT_MS).filter(|ms| *ms > 0) {
            self.timeout_ms = timeout_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_provider_kind_defaults_to_ollama() {
        assert_eq!(resolve_provider_kind(None), ProviderKind::Ollama);
        assert_eq!(resolve_provider_kind(Some("unknown")), ProviderKind::Ollama);
        assert_eq!(resolve_provider_kind(Some("OFFLINE")), ProviderKind::Offline);
        assert_eq!(resolve_provider_kind(Some("fallback")), ProviderKind::Offline);
    }
}
