use crate::error::IndexError;
use crate::index::{cosine_similarity, TfidfIndex};
use crate::query::normalize_query;
use crate::{MatchOutcome, MatcherOptions, MedicineMatch, MedicineRecord};

/// Ranks records against a free-text query. Holds no state of its own, so
/// repeated calls with the same query give the same answer.
#[derive(Debug, Clone, Copy)]
pub struct QueryMatcher<'a> {
    index: &'a TfidfIndex,
    records: &'a [MedicineRecord],
    options: &'a MatcherOptions,
}

impl<'a> QueryMatcher<'a> {
    pub fn new(
        index: &'a TfidfIndex,
        records: &'a [MedicineRecord],
        options: &'a MatcherOptions,
    ) -> Self {
        Self {
            index,
            records,
            options,
        }
    }

    /// Cosine score of every record, in row order. A query with no known
    /// terms scores zero everywhere.
    pub fn scores(&self, query: &str) -> Result<Vec<f64>, IndexError> {
        let normalized = normalize_query(query, |term| self.index.term_id(term).is_some());
        let query_vector = self.index.transform(&normalized)?;
        if query_vector.is_zero() {
            return Ok(vec![0.0; self.records.len()]);
        }

        Ok(self
            .index
            .rows()
            .iter()
            .take(self.records.len())
            .map(|row| cosine_similarity(&query_vector, row))
            .collect())
    }

    /// Highest scoring record, earliest row on ties, rejected below the
    /// relevance threshold.
    pub fn best_match(&self, query: &str) -> Result<MatchOutcome<'a>, IndexError> {
        let scores = self.scores(query)?;

        let mut best: Option<(usize, f64)> = None;
        for (row, score) in scores.into_iter().enumerate() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((row, score));
            }
        }

        let score = best.map(|(_, score)| score).unwrap_or(0.0);
        let record = best
            .filter(|(_, score)| self.accepts(*score))
            .map(|(row, score)| MedicineMatch {
                row,
                score,
                record: &self.records[row],
            });

        Ok(MatchOutcome { record, score })
    }

    /// Up to `top_k` accepted matches, best first, ties in row order.
    pub fn rank(&self, query: &str, top_k: usize) -> Result<Vec<MedicineMatch<'a>>, IndexError> {
        let mut scored: Vec<(usize, f64)> = self
            .scores(query)?
            .into_iter()
            .enumerate()
            .filter(|(_, score)| self.accepts(*score))
            .collect();

        scored.sort_by(|left, right| right.1.total_cmp(&left.1));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(row, score)| MedicineMatch {
                row,
                score,
                record: &self.records[row],
            })
            .collect())
    }

    fn accepts(&self, score: f64) -> bool {
        score > 0.0 && score >= self.options.threshold
    }
}
