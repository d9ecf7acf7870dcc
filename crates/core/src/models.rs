use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    pub name: String,
    pub composition: String,
    pub uses: String,
    pub side_effects: String,
    pub manufacturer: String,
    pub storage_condition: String,
    pub storage_temperature_c: f64,
    pub storage_humidity_percent: f64,
}

impl MedicineRecord {
    pub fn field(&self, field: IndexedField) -> &str {
        match field {
            IndexedField::Name => &self.name,
            IndexedField::Composition => &self.composition,
            IndexedField::Uses => &self.uses,
            IndexedField::SideEffects => &self.side_effects,
            IndexedField::Manufacturer => &self.manufacturer,
        }
    }

    /// Text the index is built over, fields joined by a single space.
    pub fn combined_text(&self, fields: &[IndexedField]) -> String {
        fields
            .iter()
            .map(|field| self.field(*field))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IndexedField {
    Name,
    Composition,
    Uses,
    SideEffects,
    Manufacturer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetFingerprint {
    pub source_path: String,
    pub checksum: String,
    pub record_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Supplementary label text for a matched medicine. `None` marks a field the
/// remote source could not provide.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichmentResult {
    pub indications: Option<String>,
    pub adverse_reactions: Option<String>,
    pub warnings: Option<String>,
}

impl EnrichmentResult {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.indications.is_none() && self.adverse_reactions.is_none() && self.warnings.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum QueryIntent {
    SideEffects,
    Dosage,
    Usage,
    Interaction,
    Storage,
    Composition,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedicineMatch<'a> {
    pub row: usize,
    pub score: f64,
    pub record: &'a MedicineRecord,
}

/// Best row for a query. `record` is `None` when the best score fell below the
/// threshold; `score` still reports that best score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome<'a> {
    pub record: Option<MedicineMatch<'a>>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    pub fields: Vec<IndexedField>,
    pub ngram_max: usize,
    pub stop_words: bool,
    pub max_df: f64,
    pub max_features: Option<usize>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            fields: vec![
                IndexedField::Name,
                IndexedField::Composition,
                IndexedField::Uses,
                IndexedField::SideEffects,
            ],
            ngram_max: 1,
            stop_words: true,
            max_df: 1.0,
            max_features: Some(5_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherOptions {
    pub threshold: f64,
    pub alternatives: usize,
}

pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.2;

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
            alternatives: 1,
        }
    }
}

pub const DEFAULT_OPENFDA_URL: &str = "https://api.fda.gov";

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENFDA_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerOptions {
    pub fda_max_chars: usize,
    pub alternative_max_chars: usize,
    pub show_confidence: bool,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            fda_max_chars: 200,
            alternative_max_chars: 100,
            show_confidence: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatbotConfig {
    pub index: IndexOptions,
    pub matcher: MatcherOptions,
    pub enrichment: EnrichmentOptions,
    pub composer: ComposerOptions,
}
