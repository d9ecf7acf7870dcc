use crate::dataset::MedicineTable;
use crate::error::{IndexError, Result};
use crate::index::TfidfIndex;
use crate::matcher::QueryMatcher;
use crate::{DatasetFingerprint, IndexOptions, MatcherOptions, MedicineRecord};
use std::path::Path;
use tracing::info;

/// A medicine table together with the index fitted over it. The two are only
/// ever constructed together, so a query never sees an index built from a
/// different generation of the data.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    table: MedicineTable,
    index: TfidfIndex,
}

impl KnowledgeBase {
    pub fn build(table: MedicineTable, options: &IndexOptions) -> Result<Self> {
        if table.is_empty() {
            return Err(IndexError::Unavailable("dataset has no records".to_string()).into());
        }

        let index = TfidfIndex::build(table.records(), options)?;
        if index.vocabulary_len() == 0 {
            return Err(IndexError::Unavailable(
                "dataset produced an empty vocabulary".to_string(),
            )
            .into());
        }

        info!(
            records = table.len(),
            vocabulary = index.vocabulary_len(),
            "built tf-idf index"
        );
        Ok(Self { table, index })
    }

    pub fn load(path: &Path, options: &IndexOptions) -> Result<Self> {
        let table = MedicineTable::load(path)?;
        Self::build(table, options)
    }

    pub fn matcher<'a>(&'a self, options: &'a MatcherOptions) -> QueryMatcher<'a> {
        QueryMatcher::new(&self.index, self.table.records(), options)
    }

    pub fn records(&self) -> &[MedicineRecord] {
        self.table.records()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn index(&self) -> &TfidfIndex {
        &self.index
    }

    pub fn fingerprint(&self) -> Option<&DatasetFingerprint> {
        self.table.fingerprint()
    }
}
