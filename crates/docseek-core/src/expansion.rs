use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ExpansionConfig;
use crate::llm_io::extract_json_fragment;
use crate::models::QueryIntent;
use crate::provider::{CompletionOptions, ModelProvider};
use crate::text::tokenize_terms;

/// Asks the completion model for synonym keywords. Never fails: any provider
/// or parse problem yields no extra terms.
pub struct QueryExpander<'a> {
    provider: &'a dyn ModelProvider,
    model: &'a str,
    config: &'a ExpansionConfig,
}

impl<'a> QueryExpander<'a> {
    pub fn new(provider: &'a dyn ModelProvider, model: &'a str, config: &'a ExpansionConfig) -> Self {
        Self {
            provider,
            model,
            config,
        }
    }

    /// Lowercased synonyms (len > 1) not already among the content terms.
    pub fn expand(&self, intent: &QueryIntent) -> Vec<String> {
        if !self.config.enabled || self.config.max_terms == 0 || intent.content_terms.is_empty() {
            return Vec::new();
        }

        let prompt = expansion_prompt(&intent.content_terms, self.config.max_terms);
        let options = CompletionOptions {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };
        let raw = match self.provider.complete(&prompt, self.model, &options) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "query expansion skipped");
                return Vec::new();
            }
        };

        let mut seen = intent.content_terms.iter().cloned().collect::<HashSet<_>>();
        let synonyms = parse_expansion_terms(&raw)
            .into_iter()
            .flat_map(|phrase| tokenize_terms(&phrase))
            .filter(|term| seen.insert(term.clone()))
            .take(self.config.max_terms)
            .collect::<Vec<_>>();
        debug!(count = synonyms.len(), "query expansion terms");
        synonyms
    }
}

fn expansion_prompt(terms: &[String], max_terms: usize) -> String {
    format!(
        "Suggest up to {max_terms} short synonym keywords for a local file search.\n\
Search terms: {}\n\
Return JSON only, for example {{\"synonyms\":[\"word\"]}}.",
        terms.join(", ")
    )
}

/// Strings under `synonyms`, `keywords` or `terms`, or a bare array, found
/// anywhere in `raw`. Anything unparseable yields an empty list.
#[must_use]
pub fn parse_expansion_terms(raw: &str) -> Vec<String> {
    let Some(fragment) = extract_json_fragment(raw) else {
        return Vec::new();
    };
    let Ok(value) = serde_json::from_str::<Value>(&fragment) else {
        return Vec::new();
    };

    let list = match &value {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["synonyms", "keywords", "terms"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };
    list.map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| item.trim().to_lowercase())
            .filter(|item| item.chars().count() > 1)
            .collect()
    })
    .unwrap_or_default()
}
