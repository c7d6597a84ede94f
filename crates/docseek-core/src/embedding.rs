use serde::{Deserialize, Serialize};

use crate::text::tokenize_terms;

pub const FALLBACK_DIM: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingSource {
    Provider,
    Fallback,
}

impl EmbeddingSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Fallback => "fallback",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "provider" => Self::Provider,
            _ => Self::Fallback,
        }
    }
}

/// Hash-bucketed term-frequency vectors used whenever no embedding provider
/// answers. Buckets come from BLAKE3 over the token bytes, so the same text
/// yields the same vector on every platform and every run.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackVectorizer;

impl FallbackVectorizer {
    #[must_use]
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; FALLBACK_DIM];
        for token in tokenize_terms(text) {
            accumulate_feature(&mut vec, &token, 1.0);
        }
        normalize_vector(&mut vec);
        vec
    }
}

#[must_use]
pub fn fallback_vector(text: &str) -> Vec<f32> {
    FallbackVectorizer.embed(text)
}

/// Cosine similarity over the overlapping prefix of `a` and `b`.
///
/// Provider vectors and fallback vectors can differ in length; only the
/// shared prefix is compared. Returns 0 when either prefix has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..len], &b[..len]);

    let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn accumulate_feature(vec: &mut [f32], feature: &str, weight: f32) {
    let hash = blake3::hash(feature.as_bytes());
    let bytes = hash.as_bytes();
    let idx = ((bytes[0] as usize) << 8 | bytes[1] as usize) % vec.len();
    vec[idx] += weight;
}

fn normalize_vector(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn l2_norm(vec: &[f32]) -> f32 {
        vec.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn fallback_vector_is_fixed_dimension() {
        assert_eq!(fallback_vector("quarterly revenue report").len(), FALLBACK_DIM);
        assert_eq!(fallback_vector("").len(), FALLBACK_DIM);
    }

    #[test]
    fn fallback_vector_is_bit_identical_across_calls() {
        let text = "Revenue grew 10% in Q1; operating costs fell.";
        let a = fallback_vector(text);
        let b = fallback_vector(text);
        let a_bits = a.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        let b_bits = b.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn fallback_vector_is_unit_norm_for_tokenized_text() {
        let vec = fallback_vector("meeting notes about the budget budget");
        assert!((l2_norm(&vec) - 1.0).abs() < 1e-5);
        assert!(vec.iter().all(|x| *x >= 0.0));
    }

    #[test]
    fn fallback_vector_stays_zero_without_tokens() {
        let vec = fallback_vector("a b c ! ?");
        assert!(vec.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn fallback_vector_ignores_token_order_and_case() {
        assert_eq!(
            fallback_vector("Budget Spreadsheet 2024"),
            fallback_vector("2024 spreadsheet budget")
        );
    }

    #[test]
    fn cosine_uses_overlapping_prefix_for_mismatched_lengths() {
        let long = vec![1.0, 0.0, 5.0, 5.0];
        let short = vec![1.0, 0.0];
        assert!((cosine_similarity(&long, &short) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&short, &long) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_is_zero_for_zero_norm_or_empty_inputs() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
    }

    #[test]
    fn similar_texts_score_higher_than_unrelated_texts() {
        let doc = fallback_vector("rust programming language memory safety");
        let near = fallback_vector("rust memory safety");
        let far = fallback_vector("holiday photos beach sunset");
        assert!(cosine_similarity(&doc, &near) > cosine_similarity(&doc, &far));
    }

    #[test]
    fn embedding_source_round_trips_through_str() {
        assert_eq!(
            EmbeddingSource::parse(EmbeddingSource::Provider.as_str()),
            EmbeddingSource::Provider
        );
        assert_eq!(EmbeddingSource::parse("unknown"), EmbeddingSource::Fallback);
    }

    #[test]
    fn fallback_vectorizer_performance_smoke() {
        let corpus = [
            "Quarterly report revenue grew ten percent",
            "Resume with experience and education sections",
            "Vacation photo OCR text beach 2023",
        ];
        let started = Instant::now();
        let mut checksum = 0.0f32;
        for i in 0..4_000 {
            let vec = fallback_vector(corpus[i % corpus.len()]);
            checksum += vec[i % FALLBACK_DIM];
        }
        assert!(checksum.is_finite());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
