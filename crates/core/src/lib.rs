pub mod advice;
pub mod composer;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod matcher;
pub mod models;
pub mod query;
pub mod sources;
pub mod tokenizer;
pub mod traits;

pub use advice::general_advice;
pub use composer::{list_items, truncate_chars, ResponseComposer, NOT_AVAILABLE, NO_MATCH_MESSAGE};
pub use dataset::{digest_bytes, MedicineTable};
pub use engine::ChatEngine;
pub use error::{ChatbotError, DatasetError, EnrichmentError, IndexError};
pub use index::{cosine_similarity, TermVector, TfidfIndex};
pub use knowledge::KnowledgeBase;
pub use matcher::QueryMatcher;
pub use models::{
    ChatbotConfig, ComposerOptions, DatasetFingerprint, EnrichmentOptions, EnrichmentResult,
    IndexOptions, IndexedField, MatchOutcome, MatcherOptions, MedicineMatch, MedicineRecord,
    QueryIntent, DEFAULT_OPENFDA_URL, DEFAULT_RELEVANCE_THRESHOLD,
};
pub use query::normalize_query;
pub use sources::{DisabledEnrichment, OpenFdaClient};
pub use tokenizer::{normalize_whitespace, Tokenizer, ENGLISH_STOP_WORDS};
pub use traits::EnrichmentSource;
