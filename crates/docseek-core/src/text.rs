/// Lowercased alphanumeric runs longer than one character, in input order.
#[must_use]
pub fn tokenize_terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1)
        .map(ToString::to_string)
        .collect()
}

#[must_use]
pub fn clip_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((clip_idx, _)) => text[..clip_idx].to_string(),
        None => text.to_string(),
    }
}

#[must_use]
pub fn collapse_newlines(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Lowercase fold that maps every char to exactly one char, so char offsets
/// in the folded text line up with the source text.
#[must_use]
pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
