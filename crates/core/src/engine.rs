use crate::advice::general_advice;
use crate::composer::ResponseComposer;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::traits::EnrichmentSource;
use crate::{ChatbotConfig, DatasetFingerprint, QueryIntent};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Request-scoped pipeline over a shared, read-only knowledge base:
/// match, enrich, compose. Every answer is a plain string; per-query failures
/// degrade the answer instead of surfacing as errors.
pub struct ChatEngine<S>
where
    S: EnrichmentSource,
{
    knowledge: RwLock<Arc<KnowledgeBase>>,
    source: S,
    composer: ResponseComposer,
    config: ChatbotConfig,
}

impl<S> ChatEngine<S>
where
    S: EnrichmentSource + Send + Sync,
{
    pub fn new(knowledge: KnowledgeBase, source: S, config: ChatbotConfig) -> Self {
        Self {
            knowledge: RwLock::new(Arc::new(knowledge)),
            source,
            composer: ResponseComposer::new(config.composer.clone()),
            config,
        }
    }

    /// Snapshot of the current table and index. Held for the whole request so
    /// a concurrent reload cannot mix generations.
    pub fn knowledge(&self) -> Arc<KnowledgeBase> {
        self.knowledge
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a fresh table and index from `path` and swaps them in together.
    /// On failure the current pair stays in place.
    pub fn reload(&self, path: &Path) -> Result<Option<DatasetFingerprint>> {
        let fresh = KnowledgeBase::load(path, &self.config.index)?;
        let fingerprint = fresh.fingerprint().cloned();

        let mut current = self
            .knowledge
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = current.fingerprint().map(|print| print.checksum.clone());
        *current = Arc::new(fresh);

        info!(
            path = %path.display(),
            changed = previous != fingerprint.as_ref().map(|print| print.checksum.clone()),
            "reloaded medicine knowledge base"
        );
        Ok(fingerprint)
    }

    pub async fn answer(&self, query: &str) -> String {
        let knowledge = self.knowledge();
        let intent = QueryIntent::detect(query);
        let wanted = 1 + self.config.matcher.alternatives;

        let matches = match knowledge.matcher(&self.config.matcher).rank(query, wanted) {
            Ok(matches) => matches,
            Err(error) => {
                warn!(error = %error, "query matching failed");
                Vec::new()
            }
        };

        let Some((best, alternatives)) = matches.split_first() else {
            debug!(query = %query, "no confident match");
            if let Some(advice) = general_advice(query) {
                return advice;
            }
            return self.composer.compose(None, None, intent);
        };

        debug!(
            name = %best.record.name,
            score = best.score,
            intent = ?intent,
            "matched medicine"
        );

        let enrichment = self.source.fetch(&best.record.name).await;
        let mut response = self.composer.compose(Some(best), Some(&enrichment), intent);

        let extra = self.composer.render_alternatives(alternatives);
        if !extra.is_empty() {
            response.push_str("\n\n");
            response.push_str(&extra);
        }
        response
    }
}
