use crate::traits::EnrichmentSource;
use crate::EnrichmentResult;
use async_trait::async_trait;

/// Offline source: every lookup comes back absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnrichment;

#[async_trait]
impl EnrichmentSource for DisabledEnrichment {
    async fn fetch(&self, _name: &str) -> EnrichmentResult {
        EnrichmentResult::absent()
    }
}
