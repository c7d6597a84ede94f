use crate::text::{clip_chars, collapse_newlines, fold_char};

pub const NO_PREVIEW: &str = "No preview available";

const CHARS_BEFORE_HIT: usize = 90;
const CHARS_AFTER_HIT: usize = 180;
const LEAD_CHARS: usize = 220;

/// Preview window around the first term that occurs in `text`.
///
/// `terms` are tried in order and the first one found wins, even if a later
/// term occurs earlier in the text.
#[must_use]
pub fn extract_snippet(text: &str, terms: &[String]) -> String {
    if text.trim().is_empty() {
        return NO_PREVIEW.to_string();
    }

    let chars = text.chars().collect::<Vec<_>>();
    let folded = chars.iter().copied().map(fold_char).collect::<Vec<_>>();

    let hit = terms
        .iter()
        .filter(|term| !term.is_empty())
        .find_map(|term| {
            let needle = term.chars().map(fold_char).collect::<Vec<_>>();
            find_subslice(&folded, &needle)
        });

    let window = match hit {
        Some(idx) => {
            let start = idx.saturating_sub(CHARS_BEFORE_HIT);
            let end = (idx + CHARS_AFTER_HIT).min(chars.len());
            chars[start..end].iter().collect::<String>()
        }
        None => clip_chars(text, LEAD_CHARS),
    };
    collapse_newlines(&window)
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_text_has_placeholder() {
        assert_eq!(extract_snippet("", &terms(&["q1"])), NO_PREVIEW);
        assert_eq!(extract_snippet("  \n ", &terms(&["q1"])), NO_PREVIEW);
    }

    #[test]
    fn window_surrounds_first_hit_case_insensitively() {
        let text = format!("{}Revenue grew in Q1.\nCosts fell.{}", "x".repeat(200), "y".repeat(300));
        let snippet = extract_snippet(&text, &terms(&["revenue"]));
        assert!(snippet.starts_with(&"x".repeat(90)));
        assert!(snippet.contains("Revenue grew in Q1. Costs fell."));
        assert_eq!(snippet.chars().count(), 270);
    }

    #[test]
    fn terms_are_tried_in_order() {
        let text = "alpha beta gamma";
        let snippet = extract_snippet(text, &terms(&["gamma", "alpha"]));
        assert_eq!(snippet, "alpha beta gamma");

        let long = format!("alpha {} gamma tail", "z".repeat(300));
        let snippet = extract_snippet(&long, &terms(&["gamma", "alpha"]));
        assert!(snippet.contains("gamma tail"));
        assert!(!snippet.contains("alpha"));
    }

    #[test]
    fn no_hit_returns_leading_chars() {
        let text = "\u{C548}".repeat(300);
        let snippet = extract_snippet(&text, &terms(&["missing"]));
        assert_eq!(snippet.chars().count(), 220);
    }

    #[test]
    fn newlines_are_collapsed_in_lead_fallback() {
        assert_eq!(extract_snippet("line one\nline two", &[]), "line one line two");
    }

    #[test]
    fn multibyte_text_around_hit_stays_char_aligned() {
        let text = format!("{}budget{}", "\u{00E9}".repeat(100), "\u{00FC}".repeat(200));
        let snippet = extract_snippet(&text, &terms(&["BUDGET"]));
        assert!(snippet.contains("budget"));
        assert_eq!(snippet.chars().count(), 270);
    }
}
