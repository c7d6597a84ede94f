use crate::config::{CategoryWeights, LexicalWeights};
use crate::models::{IndexedDocument, QueryIntent};
use crate::text::tokenize_terms;

pub(crate) const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "heic", "tif", "tiff"];
pub(crate) const DOCUMENT_EXTENSIONS: &[&str] = &["md", "txt", "rtf", "text", "markdown", "pdf", "docx"];

const CATEGORY_BOUND: f32 = 0.5;

/// Lowercased views of the fields every signal inspects.
pub(crate) struct DocumentFields {
    pub title: String,
    pub path: String,
    pub body: String,
    pub extension: String,
}

impl DocumentFields {
    pub(crate) fn new(document: &IndexedDocument) -> Self {
        Self {
            title: document.title.to_lowercase(),
            path: document.path.to_lowercase(),
            body: document.extracted_text.to_lowercase(),
            extension: document.extension(),
        }
    }

    pub(crate) fn contains(&self, term: &str) -> bool {
        self.title.contains(term) || self.path.contains(term) || self.body.contains(term)
    }

    fn is_image(&self) -> bool {
        IMAGE_EXTENSIONS.contains(&self.extension.as_str())
    }

    fn is_document(&self) -> bool {
        DOCUMENT_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// Longer terms are more specific, so their hits count for more.
fn length_weight(term: &str) -> f32 {
    #[allow(clippy::cast_precision_loss, reason = "term lengths are small")]
    let chars = term.chars().count() as f32;
    (chars / 4.0).clamp(0.5, 1.5)
}

fn term_score(fields: &DocumentFields, term: &str, weights: &LexicalWeights) -> f32 {
    if term.is_empty() || weights.term_cap <= 0.0 {
        return 0.0;
    }
    let title_hits = fields.title.matches(term).count();
    let path_hits = fields.path.matches(term).count();
    let body_hits = fields.body.matches(term).count().min(weights.body_hit_cap);

    #[allow(clippy::cast_precision_loss, reason = "hit counts are small")]
    let raw = (title_hits as f32 * weights.title
        + path_hits as f32 * weights.path
        + body_hits as f32 * weights.body)
        * length_weight(term);
    raw.min(weights.term_cap) / weights.term_cap
}

/// Term-match score in `[0, 1]`, normalized by the number of content terms.
pub(crate) fn lexical_score(
    fields: &DocumentFields,
    content_terms: &[String],
    synonyms: &[String],
    weights: &LexicalWeights,
) -> f32 {
    if content_terms.is_empty() {
        return 0.0;
    }
    let direct = content_terms
        .iter()
        .map(|term| term_score(fields, term, weights))
        .sum::<f32>();
    let expanded = synonyms
        .iter()
        .map(|term| term_score(fields, term, weights) * weights.synonym)
        .sum::<f32>();

    #[allow(clippy::cast_precision_loss, reason = "term counts are small")]
    let normalized = (direct + expanded) / content_terms.len() as f32;
    normalized.clamp(0.0, 1.0)
}

/// File-type and resume affinity in `[-0.5, 0.5]`.
pub(crate) fn category_score(
    fields: &DocumentFields,
    intent: &QueryIntent,
    weights: &CategoryWeights,
) -> f32 {
    let mut score = 0.0;

    if intent.prefers_images {
        if fields.is_image() {
            score += weights.image_match;
        } else {
            score -= weights.image_mismatch;
        }
    } else if intent.prefers_documents {
        if fields.is_document() {
            score += weights.document_match;
        } else if fields.is_image() {
            score -= weights.document_image_mismatch;
        }
    }

    if intent.is_resume_query {
        let named = has_resume_name(&fields.title) || has_resume_name(&fields.path);
        let body = fields.body.contains("experience") && fields.body.contains("education");
        if named {
            score += weights.resume_name_match;
        }
        if body {
            score += weights.resume_body_match;
        }
        if !named && !body {
            score -= weights.resume_missing;
        }
    }

    score.clamp(-CATEGORY_BOUND, CATEGORY_BOUND)
}

fn has_resume_name(field: &str) -> bool {
    field.contains("resume") || tokenize_terms(field).iter().any(|token| token == "cv")
}

/// Image text that is too short or mostly digits is usually OCR noise.
pub(crate) fn is_unreliable_image_text(fields: &DocumentFields, min_terms: usize) -> bool {
    if !fields.is_image() {
        return false;
    }
    if tokenize_terms(&fields.body).len() < min_terms {
        return true;
    }
    let digits = fields.body.chars().filter(char::is_ascii_digit).count();
    let letters = fields.body.chars().filter(|c| c.is_alphabetic()).count();
    digits > letters
}
