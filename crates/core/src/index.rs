use crate::error::IndexError;
use crate::tokenizer::Tokenizer;
use crate::{IndexOptions, MedicineRecord};
use std::collections::{BTreeMap, HashMap};

/// Sparse weighted-term vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let mut vector = Self {
            entries: weights.into_iter().filter(|(_, weight)| *weight != 0.0).collect(),
        };

        let magnitude = vector.norm();
        if magnitude > 0.0 {
            for (_, weight) in &mut vector.entries {
                *weight /= magnitude;
            }
        }
        vector
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut left, mut right) = (0, 0);
        let mut total = 0.0;
        while left < self.entries.len() && right < other.entries.len() {
            let (left_term, left_weight) = self.entries[left];
            let (right_term, right_weight) = other.entries[right];
            match left_term.cmp(&right_term) {
                std::cmp::Ordering::Less => left += 1,
                std::cmp::Ordering::Greater => right += 1,
                std::cmp::Ordering::Equal => {
                    total += left_weight * right_weight;
                    left += 1;
                    right += 1;
                }
            }
        }
        total
    }
}

pub fn cosine_similarity(left: &TermVector, right: &TermVector) -> f64 {
    let denominator = left.norm() * right.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    left.dot(right) / denominator
}

/// TF-IDF vector space fitted over the combined text of every record.
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<TermVector>,
}

impl TfidfIndex {
    pub fn build(records: &[MedicineRecord], options: &IndexOptions) -> Result<Self, IndexError> {
        let tokenizer = Tokenizer::new(options.stop_words, options.ngram_max)?;
        let documents: Vec<Vec<String>> = records
            .iter()
            .map(|record| tokenizer.tokenize(&record.combined_text(&options.fields)))
            .collect();

        // term -> (document frequency, corpus frequency)
        let mut stats = BTreeMap::<&str, (usize, usize)>::new();
        for document in &documents {
            let mut seen = Vec::<&str>::new();
            for term in document {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.1 += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term.as_str());
                    entry.0 += 1;
                }
            }
        }

        let document_count = documents.len();
        if options.max_df < 1.0 {
            let max_documents = options.max_df * document_count as f64;
            stats.retain(|_, (document_frequency, _)| *document_frequency as f64 <= max_documents);
        }

        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .map(|(term, (document_frequency, corpus_frequency))| {
                (term, document_frequency, corpus_frequency)
            })
            .collect();
        if let Some(limit) = options.max_features {
            if kept.len() > limit {
                kept.sort_by(|left, right| right.2.cmp(&left.2).then(left.0.cmp(right.0)));
                kept.truncate(limit);
                kept.sort_by(|left, right| left.0.cmp(right.0));
            }
        }

        let vocabulary: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(id, (term, _, _))| (term.to_string(), id))
            .collect();
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, document_frequency, _)| smooth_idf(document_count, *document_frequency))
            .collect();

        let mut index = Self {
            tokenizer,
            vocabulary,
            idf,
            rows: Vec::with_capacity(document_count),
        };
        let rows = documents
            .iter()
            .map(|document| index.weigh(document))
            .collect();
        index.rows = rows;

        Ok(index)
    }

    /// Projects text into the fitted space. Out-of-vocabulary terms carry no
    /// weight, so unknown or empty text yields the zero vector.
    pub fn transform(&self, text: &str) -> Result<TermVector, IndexError> {
        if self.vocabulary.is_empty() {
            return Err(IndexError::Unavailable(
                "vocabulary is empty; no records were indexed".to_string(),
            ));
        }
        Ok(self.weigh(&self.tokenizer.tokenize(text)))
    }

    fn weigh(&self, terms: &[String]) -> TermVector {
        let mut weights = BTreeMap::<usize, f64>::new();
        for term in terms {
            if let Some(&id) = self.vocabulary.get(term) {
                *weights.entry(id).or_insert(0.0) += self.idf[id];
            }
        }
        TermVector::from_weights(weights)
    }

    pub fn rows(&self) -> &[TermVector] {
        &self.rows
    }

    pub fn document_count(&self) -> usize {
        self.rows.len()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_id(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

fn smooth_idf(document_count: usize, document_frequency: usize) -> f64 {
    ((1.0 + document_count as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_table;

    #[test]
    fn build_is_deterministic() {
        let table = sample_table();
        let first = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        let second = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        assert_eq!(first.rows(), second.rows());
        assert_eq!(first.vocabulary_len(), second.vocabulary_len());
        assert_eq!(first.term_id("augmentin"), second.term_id("augmentin"));
    }

    #[test]
    fn rows_are_unit_length() {
        let table = sample_table();
        let index = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        assert_eq!(index.document_count(), 4);
        for row in index.rows() {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn common_terms_are_down_weighted() {
        let table = sample_table();
        let index = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        let row = &index.rows()[0];
        let weight_of = |term: &str| {
            let id = index.term_id(term).expect("term is indexed");
            row.entries()
                .iter()
                .find(|(entry, _)| *entry == id)
                .map(|(_, weight)| *weight)
                .expect("term is present in the first row")
        };
        // "treatment" occurs in every record, "augmentin" in one.
        assert!(weight_of("augmentin") > weight_of("treatment"));
    }

    #[test]
    fn unseen_terms_transform_to_zero_vector() {
        let table = sample_table();
        let index = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        assert!(index.transform("zzz qjk").unwrap().is_zero());
        assert!(index.transform("   ").unwrap().is_zero());
    }

    #[test]
    fn transform_fails_without_records() {
        let index = TfidfIndex::build(&[], &IndexOptions::default()).unwrap();
        let error = index.transform("augmentin").unwrap_err();
        assert!(matches!(error, IndexError::Unavailable(_)));
    }

    #[test]
    fn max_features_keeps_most_frequent_terms() {
        let table = sample_table();
        let options = IndexOptions {
            max_features: Some(3),
            ..IndexOptions::default()
        };
        let index = TfidfIndex::build(table.records(), &options).unwrap();
        assert_eq!(index.vocabulary_len(), 3);
        // ties on corpus frequency fall back to term order
        assert!(index.term_id("treatment").is_some());
        assert!(index.term_id("500mg").is_some());
        assert!(index.term_id("diarrhea").is_some());
        assert!(index.term_id("nausea").is_none());
    }

    #[test]
    fn max_df_prunes_ubiquitous_terms() {
        let table = sample_table();
        let options = IndexOptions {
            max_df: 0.95,
            ..IndexOptions::default()
        };
        let index = TfidfIndex::build(table.records(), &options).unwrap();
        assert!(index.term_id("treatment").is_none());
        assert!(index.term_id("augmentin").is_some());
    }

    #[test]
    fn cosine_of_disjoint_vectors_is_zero() {
        let table = sample_table();
        let index = TfidfIndex::build(table.records(), &IndexOptions::default()).unwrap();
        let left = index.transform("augmentin").unwrap();
        let right = index.transform("pantoprazole").unwrap();
        assert_eq!(cosine_similarity(&left, &right), 0.0);
        assert!((cosine_similarity(&left, &left) - 1.0).abs() < 1e-9);
    }
}
