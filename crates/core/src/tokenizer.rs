use crate::error::IndexError;
use regex::Regex;
use std::collections::HashSet;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

pub const ENGLISH_STOP_WORDS: [&str; 130] = [
    "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am", "an",
    "and", "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "either", "else", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no",
    "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\u{a0}', " ")
}

/// Lowercasing word tokenizer. Words are runs of two or more word characters;
/// n-grams are formed after stop words are dropped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    stop_words: HashSet<&'static str>,
    ngram_max: usize,
}

impl Tokenizer {
    pub fn new(remove_stop_words: bool, ngram_max: usize) -> Result<Self, IndexError> {
        let stop_words = if remove_stop_words {
            ENGLISH_STOP_WORDS.iter().copied().collect()
        } else {
            HashSet::new()
        };

        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
            stop_words,
            ngram_max: ngram_max.max(1),
        })
    }

    pub fn words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|found| found.as_str())
            .filter(|word| !self.stop_words.contains(word))
            .map(str::to_string)
            .collect()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        if self.ngram_max == 1 {
            return words;
        }

        let mut terms = words.clone();
        for size in 2..=self.ngram_max {
            terms.extend(words.windows(size).map(|window| window.join(" ")));
        }
        terms
    }
}
