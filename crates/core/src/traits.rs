use crate::EnrichmentResult;
use async_trait::async_trait;

/// Best-effort lookup of supplementary label text for a medicine name.
/// Implementations absorb their own failures and report them as absent fields.
#[async_trait]
pub trait EnrichmentSource {
    async fn fetch(&self, name: &str) -> EnrichmentResult;
}
