use crate::tokenizer::normalize_whitespace;
use crate::QueryIntent;

const QUESTION_WORDS: [&str; 13] = [
    "what", "how", "when", "where", "why", "can", "could", "should", "would", "is", "are", "do",
    "does",
];

const SPELLING_CORRECTIONS: [(&str, &str); 3] = [
    ("paracetamol", "acetaminophen"),
    ("asprin", "aspirin"),
    ("ibuprofin", "ibuprofen"),
];

const INTENT_PATTERNS: [(QueryIntent, &[&str]); 6] = [
    (
        QueryIntent::SideEffects,
        &["side effect", "adverse", "reaction", "harmful", "danger"],
    ),
    (
        QueryIntent::Dosage,
        &["dose", "dosage", "how much", "quantity", "amount"],
    ),
    (
        QueryIntent::Usage,
        &["use", "used for", "treat", "cure", "help"],
    ),
    (
        QueryIntent::Interaction,
        &["interact", "combination", "together", "mix"],
    ),
    (
        QueryIntent::Storage,
        &["store", "storage", "keep", "preserve"],
    ),
    (
        QueryIntent::Composition,
        &["ingredient", "composition", "contain", "made of"],
    ),
];

/// Lowercases the query, strips question words and fixes a few common
/// misspellings before it is projected into the index. A word is only
/// corrected when `is_known` rejects it and accepts the correction, so
/// spellings the dataset itself uses are left alone.
pub fn normalize_query(query: &str, is_known: impl Fn(&str) -> bool) -> String {
    let lowered = query.to_lowercase();
    let kept = lowered
        .split_whitespace()
        .filter_map(|word| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            if QUESTION_WORDS.contains(&bare) {
                return None;
            }
            match correction(bare, &is_known) {
                Some(right) => Some(word.replacen(bare, right, 1)),
                None => Some(word.to_string()),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    normalize_whitespace(&kept)
}

fn correction(word: &str, is_known: impl Fn(&str) -> bool) -> Option<&'static str> {
    SPELLING_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == word)
        .map(|(_, right)| *right)
        .filter(|right| !is_known(word) && is_known(*right))
}

impl QueryIntent {
    /// First intent whose pattern occurs in the lowercased query.
    pub fn detect(query: &str) -> Self {
        let lowered = query.to_lowercase();
        INTENT_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|pattern| lowered.contains(pattern)))
            .map(|(intent, _)| *intent)
            .unwrap_or(QueryIntent::General)
    }
}
