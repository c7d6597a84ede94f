use std::collections::HashSet;

use crate::models::QueryIntent;
use crate::text::tokenize_terms;

const STOPWORDS: &[&str] = &[
    // articles, conjunctions
    "a", "an", "the", "and", "or", "but", "nor",
    // prepositions
    "in", "on", "at", "to", "for", "of", "from", "with", "about", "by", "into", "over",
    "under", "as", "than", "like", "near", "between", "within", "without",
    // pronouns, determiners
    "i", "me", "my", "mine", "we", "us", "our", "you", "your", "he", "him", "his", "she",
    "her", "it", "its", "they", "them", "their", "this", "that", "these", "those", "some",
    "any", "all",
    // interrogatives
    "what", "which", "who", "whom", "whose", "where", "when", "why", "how",
    // auxiliaries
    "is", "are", "was", "were", "be", "been", "do", "does", "did", "can", "could", "would",
    "should", "will", "have", "has", "had",
    // request verbs
    "find", "show", "search", "look", "looking", "get", "give", "open", "list", "locate",
    "fetch", "need", "want", "please", "help",
];

const RESUME_TERMS: &[&str] = &["resume", "resumes", "cv", "curriculum", "vitae"];

const IMAGE_TERMS: &[&str] = &[
    "image", "images", "photo", "photos", "picture", "pictures", "pic", "pics", "screenshot",
    "screenshots", "png", "jpg", "jpeg", "heic", "scan", "scans",
];

const DOCUMENT_TERMS: &[&str] = &[
    "document", "documents", "doc", "docs", "docx", "pdf", "pdfs", "file", "files",
    "spreadsheet", "spreadsheets", "paper", "papers",
];

/// Infers what the user is asking for from the raw query text.
#[must_use]
pub fn classify(query: &str) -> QueryIntent {
    let normalized_query = query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();

    let mut seen = HashSet::new();
    let content_terms = tokenize_terms(&normalized_query)
        .into_iter()
        .filter(|term| !STOPWORDS.contains(&term.as_str()))
        .filter(|term| seen.insert(term.clone()))
        .collect::<Vec<_>>();

    let mentions = |set: &[&str]| content_terms.iter().any(|term| set.contains(&term.as_str()));
    let is_resume_query = mentions(RESUME_TERMS);
    let prefers_images = mentions(IMAGE_TERMS);
    let prefers_documents = !prefers_images && (mentions(DOCUMENT_TERMS) || is_resume_query);

    let required_terms = content_terms
        .iter()
        .filter(|term| !is_category_term(term))
        .cloned()
        .collect();

    QueryIntent {
        normalized_query,
        content_terms,
        required_terms,
        prefers_documents,
        prefers_images,
        is_resume_query,
    }
}

fn is_category_term(term: &str) -> bool {
    [RESUME_TERMS, IMAGE_TERMS, DOCUMENT_TERMS]
        .iter()
        .any(|set| set.contains(&term))
}
