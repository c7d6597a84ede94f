use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

use crate::error::{DocseekError, Result};

use super::env::{read_env_bool, read_env_list, read_env_usize};

const ENV_EXTENSIONS: &str = "DOCSEEK_EXTENSIONS";
const ENV_EXCLUDE: &str = "DOCSEEK_EXCLUDE";
const ENV_MAX_TEXT_CHARS: &str = "DOCSEEK_MAX_TEXT_CHARS";
const ENV_INDEX_STRICT: &str = "DOCSEEK_INDEX_STRICT";

pub const DEFAULT_MAX_TEXT_CHARS: usize = 50_000;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "md", "txt", "rtf", "text", "markdown", "pdf", "docx", "png", "jpg", "jpeg", "heic", "tif",
    "tiff",
];

const DEFAULT_EXCLUDE: &[&str] = &["**/.git/**", "**/node_modules/**"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub max_text_chars: usize,
    pub strict_root: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(ToString::to_string).collect(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            strict_root: false,
        }
    }
}

impl IndexingConfig {
    pub(super) fn apply_env(&mut self) {
        if let Some(extensions) = read_env_list(ENV_EXTENSIONS) {
            self.extensions = extensions;
        }
        if let Some(exclude) = read_env_list(ENV_EXCLUDE) {
            self.exclude = exclude;
        }
        self.max_text_chars = read_env_usize(ENV_MAX_TEXT_CHARS, self.max_text_chars, 1);
        self.strict_root = read_env_bool(ENV_INDEX_STRICT, self.strict_root);
    }

    #[must_use]
    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            builder.add(Glob::new(pattern).map_err(|err| {
                DocseekError::Validation(format!("invalid exclude glob {pattern:?}: {err}"))
            })?);
        }
        builder
            .build()
            .map_err(|err| DocseekError::Validation(err.to_string()))
    }
}
