use serde::Deserialize;

use crate::error::{DocseekError, Result};

use super::env::{read_env_bool, read_env_unit_f32, read_env_usize, read_non_empty_env};

const ENV_STORE_BACKEND: &str = "DOCSEEK_STORE";
const ENV_SEMANTIC_GATE_THRESHOLD: &str = "DOCSEEK_SEMANTIC_GATE_THRESHOLD";
const ENV_MIN_SCORE: &str = "DOCSEEK_MIN_SCORE";
const ENV_MIN_SCORE_TYPED: &str = "DOCSEEK_MIN_SCORE_TYPED";
const ENV_QUERY_EXPANSION: &str = "DOCSEEK_QUERY_EXPANSION";
const ENV_EXPANSION_MAX_TERMS: &str = "DOCSEEK_EXPANSION_MAX_TERMS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StoreBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    pub(super) fn parse(raw: Option<&str>) -> Result<Self> {
        let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            None | Some("sqlite") => Ok(Self::Sqlite),
            Some("memory") => Ok(Self::Memory),
            Some(other) => Err(DocseekError::Validation(format!(
                "invalid {ENV_STORE_BACKEND}: {other} (expected sqlite|memory)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            file_name: "docseek.db".to_string(),
        }
    }
}

impl StoreConfig {
    pub(super) fn apply_env(&mut self) -> Result<()> {
        if let Some(raw) = read_non_empty_env(ENV_STORE_BACKEND) {
            self.backend = StoreBackend::parse(Some(&raw))?;
        }
        Ok(())
    }
}

/// Share of each sub-score in the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub lexical: f32,
    pub semantic: f32,
    pub category: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

impl BlendWeights {
    /// Query embedding and content terms both present.
    pub const BALANCED: Self = Self {
        lexical: 0.62,
        semantic: 0.25,
        category: 0.13,
    };
    /// No query embedding.
    pub const LEXICAL_ONLY: Self = Self {
        lexical: 0.8,
        semantic: 0.0,
        category: 0.2,
    };
    /// No content terms left after stopword removal.
    pub const SEMANTIC_ONLY: Self = Self {
        lexical: 0.0,
        semantic: 0.85,
        category: 0.15,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LexicalWeights {
    pub title: f32,
    pub path: f32,
    pub body: f32,
    pub body_hit_cap: usize,
    pub term_cap: f32,
    pub synonym: f32,
}

impl Default for LexicalWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            path: 2.0,
            body: 1.0,
            body_hit_cap: 5,
            term_cap: 4.0,
            synonym: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub image_match: f32,
    pub image_mismatch: f32,
    pub document_match: f32,
    pub document_image_mismatch: f32,
    pub resume_name_match: f32,
    pub resume_body_match: f32,
    pub resume_missing: f32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            image_match: 0.35,
            image_mismatch: 0.2,
            document_match: 0.2,
            document_image_mismatch: 0.25,
            resume_name_match: 0.3,
            resume_body_match: 0.2,
            resume_missing: 0.1,
        }
    }
}

/// Tuned ranking constants. None of these have a derivation; they are kept
/// as named, overridable values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub balanced_weights: BlendWeights,
    pub lexical_only_weights: BlendWeights,
    pub semantic_only_weights: BlendWeights,
    pub lexical: LexicalWeights,
    pub category: CategoryWeights,
    pub semantic_gate_threshold: f32,
    pub missing_required_penalty: f32,
    pub missing_required_soft_penalty: f32,
    pub image_text_penalty: f32,
    pub min_image_terms: usize,
    pub min_score: f32,
    pub min_score_with_type_preference: f32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            balanced_weights: BlendWeights::BALANCED,
            lexical_only_weights: BlendWeights::LEXICAL_ONLY,
            semantic_only_weights: BlendWeights::SEMANTIC_ONLY,
            lexical: LexicalWeights::default(),
            category: CategoryWeights::default(),
            semantic_gate_threshold: 0.78,
            missing_required_penalty: 0.1,
            missing_required_soft_penalty: 0.55,
            image_text_penalty: 0.15,
            min_image_terms: 10,
            min_score: 0.12,
            min_score_with_type_preference: 0.16,
        }
    }
}

impl RankingConfig {
    pub(super) fn apply_env(&mut self) {
        self.semantic_gate_threshold =
            read_env_unit_f32(ENV_SEMANTIC_GATE_THRESHOLD, self.semantic_gate_threshold);
        self.min_score = read_env_unit_f32(ENV_MIN_SCORE, self.min_score);
        self.min_score_with_type_preference =
            read_env_unit_f32(ENV_MIN_SCORE_TYPED, self.min_score_with_type_preference);
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub enabled: bool,
    pub max_terms: usize,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_terms: 6,
            temperature: 0.2,
            max_output_tokens: 128,
        }
    }
}

impl ExpansionConfig {
    pub(super) fn apply_env(&mut self) {
        self.enabled = read_env_bool(ENV_QUERY_EXPANSION, self.enabled);
        self.max_terms = read_env_usize(ENV_EXPANSION_MAX_TERMS, self.max_terms, 0);
    }
}
