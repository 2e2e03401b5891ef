use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use voar_core::{CanonicalOffer, ProviderAdapter, RawOffer, SearchQuery};

use crate::cache::{cache_key, AggregationCache};
use crate::dedupe::dedupe;
use crate::normalize::normalize;
use crate::rank::{paginate, rank};
use crate::{AggregateError, AggregateResult};

/// What happens when part of the fan-out fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanoutPolicy {
    /// Any adapter failure fails the whole aggregation.
    FailFast,
    /// Failed adapters are logged and skipped; the response is marked
    /// partial. Every adapter failing is still an error.
    CollectAvailable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageMeta {
    pub total_results: usize,
    pub page: u32,
    pub per_page: u32,
    pub partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultPage {
    pub meta: PageMeta,
    pub results: Vec<CanonicalOffer>,
}

/// Drives one search end to end: cache lookup, concurrent fan-out over
/// every configured adapter, normalize, dedupe, rank, paginate.
///
/// Merge order is deterministic: adapter call order, each adapter's
/// own list order preserved, which also fixes the dedup representative
/// and the tiebreak order of equal prices.
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    cache: AggregationCache,
    policy: FanoutPolicy,
    adapter_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn ProviderAdapter>>,
        cache: AggregationCache,
        policy: FanoutPolicy,
        adapter_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            cache,
            policy,
            adapter_timeout,
        }
    }

    pub async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
        per_page: u32,
    ) -> AggregateResult<ResultPage> {
        let key = cache_key(query);
        let cached = self
            .cache
            .get_or_compute(&key, move || self.aggregate(query))
            .await?;

        let results = paginate(&cached.data, page, per_page).to_vec();
        Ok(ResultPage {
            meta: PageMeta {
                total_results: cached.data.len(),
                page,
                per_page,
                partial: cached.partial,
            },
            results,
        })
    }

    /// Full fan-out pass. Returns the deduped, ranked set plus whether
    /// any adapter was skipped under `CollectAvailable`.
    async fn aggregate(&self, query: &SearchQuery) -> AggregateResult<(Vec<CanonicalOffer>, bool)> {
        let timeout_secs = self.adapter_timeout.as_secs();
        let fetches = self.providers.iter().map(|provider| async move {
            let started = Instant::now();
            match tokio::time::timeout(self.adapter_timeout, provider.fetch_offers(query)).await {
                Ok(Ok(batch)) => {
                    tracing::debug!(
                        provider = provider.name(),
                        count = batch.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "provider fetch complete"
                    );
                    Ok(batch)
                }
                Ok(Err(err)) => Err(AggregateError::Provider(err)),
                Err(_) => Err(AggregateError::Timeout {
                    provider: provider.name().to_string(),
                    timeout_secs,
                }),
            }
        });

        let settled = join_all(fetches).await;
        let adapter_count = settled.len();

        let mut raw: Vec<RawOffer> = Vec::new();
        let mut failures = 0usize;
        match self.policy {
            FanoutPolicy::FailFast => {
                for result in settled {
                    raw.extend(result?);
                }
            }
            FanoutPolicy::CollectAvailable => {
                for result in settled {
                    match result {
                        Ok(batch) => raw.extend(batch),
                        Err(err) => {
                            tracing::warn!(error = %err, "provider failed, degrading to available results");
                            failures += 1;
                        }
                    }
                }
                if adapter_count > 0 && failures == adapter_count {
                    return Err(AggregateError::AllProvidersFailed);
                }
            }
        }

        let offers = rank(dedupe(raw.iter().map(normalize).collect()));
        tracing::debug!(
            total = offers.len(),
            failures,
            "aggregation pass complete"
        );
        Ok((offers, failures > 0))
    }
}
