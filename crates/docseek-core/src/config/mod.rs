use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

mod env;
mod indexing;
mod provider;
mod search;

pub use env::parse_env_bool;
pub use indexing::{DEFAULT_MAX_TEXT_CHARS, IndexingConfig, SUPPORTED_EXTENSIONS};
pub use provider::{ProviderConfig, ProviderKind, resolve_provider_kind};
pub use search::{
    BlendWeights, CategoryWeights, ExpansionConfig, LexicalWeights, RankingConfig, StoreBackend,
    StoreConfig,
};

pub const CONFIG_FILE_ENV: &str = "DOCSEEK_CONFIG";

/// Runtime configuration. Defaults, then an optional TOML file, then
/// `DOCSEEK_*` environment variables, in that order of precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub indexing: IndexingConfig,
    pub ranking: RankingConfig,
    pub expansion: ExpansionConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = match env::read_non_empty_env(CONFIG_FILE_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn load(file: Option<&Path>) -> Result<Self> {
        let Some(file) = file else {
            return Self::from_env();
        };
        let mut config = Self::from_file(file)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        self.store.apply_env()?;
        self.provider.apply_env();
        self.indexing.apply_env();
        self.ranking.apply_env();
        self.expansion.apply_env();
        Ok(())
    }
}
