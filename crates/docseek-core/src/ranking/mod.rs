use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::{AppConfig, BlendWeights};
use crate::embedding::cosine_similarity;
use crate::error::Result;
use crate::expansion::QueryExpander;
use crate::intent::classify;
use crate::models::{FileSearchResult, IndexedDocument, QueryIntent, ScoreBreakdown};
use crate::provider::ModelProvider;
use crate::snippet::extract_snippet;

mod signals;

use signals::{DocumentFields, category_score, is_unreliable_image_text, lexical_score};

/// Scores a snapshot of indexed documents against a natural-language query.
pub struct HybridRanker<'a> {
    provider: &'a dyn ModelProvider,
    config: &'a AppConfig,
}

impl<'a> HybridRanker<'a> {
    pub fn new(provider: &'a dyn ModelProvider, config: &'a AppConfig) -> Self {
        Self { provider, config }
    }

    pub fn rank(
        &self,
        query: &str,
        documents: &[IndexedDocument],
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileSearchResult>> {
        let intent = classify(query);
        if limit == 0 || documents.is_empty() || intent.normalized_query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.query_embedding(&intent);
        let synonyms = QueryExpander::new(
            self.provider,
            &self.config.provider.completion_model,
            &self.config.expansion,
        )
        .expand(&intent);
        let weights = self.blend_weights(&intent, query_embedding.is_some());

        let mut scored = Vec::with_capacity(documents.len());
        for document in documents {
            cancel.check()?;
            let breakdown =
                self.score_document(document, &intent, &synonyms, query_embedding.as_deref());
            let score = self.final_score(&breakdown, &weights);
            scored.push((document, breakdown, score));
        }

        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.path.cmp(&b.0.path))
        });

        let cutoff = if intent.has_type_preference() {
            self.config.ranking.min_score_with_type_preference
        } else {
            self.config.ranking.min_score
        };
        let snippet_terms = intent
            .content_terms
            .iter()
            .chain(&synonyms)
            .cloned()
            .collect::<Vec<_>>();

        let results = scored
            .into_iter()
            .filter(|(_, _, score)| *score >= cutoff)
            .take(limit)
            .map(|(document, breakdown, score)| FileSearchResult {
                snippet: extract_snippet(&document.extracted_text, &snippet_terms),
                document: document.clone(),
                score,
                breakdown,
            })
            .collect::<Vec<_>>();

        debug!(
            query = %intent.normalized_query,
            candidates = documents.len(),
            returned = results.len(),
            semantic = query_embedding.is_some(),
            synonyms = synonyms.len(),
            "ranked query"
        );
        Ok(results)
    }

    /// Query embedding from the provider only. Short queries are not run
    /// through the fallback vectorizer; the semantic signal is dropped.
    fn query_embedding(&self, intent: &QueryIntent) -> Option<Vec<f32>> {
        match self
            .provider
            .embed(&intent.normalized_query, &self.config.provider.embed_model)
        {
            Ok(vector) if !vector.is_empty() && vector.iter().all(|x| x.is_finite()) => {
                Some(vector)
            }
            Ok(_) => {
                warn!("unusable query embedding, ranking without semantic signal");
                None
            }
            Err(err) => {
                warn!(error = %err, "query embedding unavailable, ranking without semantic signal");
                None
            }
        }
    }

    fn blend_weights(&self, intent: &QueryIntent, has_embedding: bool) -> BlendWeights {
        let ranking = &self.config.ranking;
        if !has_embedding {
            ranking.lexical_only_weights
        } else if intent.content_terms.is_empty() {
            ranking.semantic_only_weights
        } else {
            ranking.balanced_weights
        }
    }

    fn score_document(
        &self,
        document: &IndexedDocument,
        intent: &QueryIntent,
        synonyms: &[String],
        query_embedding: Option<&[f32]>,
    ) -> ScoreBreakdown {
        let ranking = &self.config.ranking;
        let fields = DocumentFields::new(document);

        let semantic = query_embedding
            .map(|query| cosine_similarity(query, &document.embedding).clamp(0.0, 1.0))
            .unwrap_or(0.0);
        let lexical = lexical_score(&fields, &intent.content_terms, synonyms, &ranking.lexical);
        let category = category_score(&fields, intent, &ranking.category);
        let quality = if !intent.prefers_images
            && is_unreliable_image_text(&fields, ranking.min_image_terms)
        {
            -ranking.image_text_penalty
        } else {
            0.0
        };
        let required_terms_missing = !intent.required_terms.is_empty()
            && !intent
                .required_terms
                .iter()
                .any(|term| fields.contains(term));

        ScoreBreakdown {
            semantic,
            lexical,
            category,
            quality,
            required_terms_missing,
        }
    }

    fn final_score(&self, breakdown: &ScoreBreakdown, weights: &BlendWeights) -> f32 {
        let ranking = &self.config.ranking;
        let mut score = weights.lexical * breakdown.lexical
            + weights.semantic * breakdown.semantic
            + weights.category * breakdown.category
            + breakdown.quality;

        if breakdown.required_terms_missing {
            score *= if breakdown.semantic >= ranking.semantic_gate_threshold {
                ranking.missing_required_soft_penalty
            } else {
                ranking.missing_required_penalty
            };
        }
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
