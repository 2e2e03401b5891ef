use async_trait::async_trait;

use crate::offer::RawOffer;
use crate::query::SearchQuery;
use crate::ProviderResult;

/// One upstream source of raw flight-offer data.
///
/// Every adapter is driven through this seam, whether it calls a real
/// external API or synthesizes placeholder offers; the orchestrator
/// never special-cases an adapter by type.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable identity tag, stamped onto every record this adapter emits.
    fn name(&self) -> &str;

    /// Fetch raw offers matching the query.
    ///
    /// May return an empty list; failure surfaces the upstream status
    /// or transport problem, never a panic.
    async fn fetch_offers(&self, query: &SearchQuery) -> ProviderResult<Vec<RawOffer>>;
}
