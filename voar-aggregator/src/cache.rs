use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use voar_core::{CanonicalOffer, SearchQuery};

use crate::AggregateResult;

/// Time source for freshness checks, injectable so tests can drive
/// expiry without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Canonical, order-independent cache key over the aggregation-relevant
/// query subset. Origins are trimmed, uppercased and sorted before
/// encoding so origin ordering or casing differences cannot diverge
/// keys; `page`, `per_page` and `limit` are deliberately excluded
/// because the full unpaginated result set is what gets cached.
pub fn cache_key(query: &SearchQuery) -> String {
    #[derive(Serialize)]
    struct KeyFields<'a> {
        origins: &'a [String],
        from_date: &'a str,
        to_date: &'a str,
    }

    let mut origins: Vec<String> = query
        .origins
        .iter()
        .map(|o| o.trim().to_ascii_uppercase())
        .collect();
    origins.sort();

    serde_json::to_string(&KeyFields {
        origins: &origins,
        from_date: &query.from_date,
        to_date: &query.to_date,
    })
    .unwrap_or_default()
}

struct CacheEntry {
    created_at: DateTime<Utc>,
    data: Arc<Vec<CanonicalOffer>>,
    partial: bool,
}

/// A cached aggregation result, shared rather than cloned per request.
#[derive(Clone)]
pub struct CachedResult {
    pub data: Arc<Vec<CanonicalOffer>>,
    pub partial: bool,
}

/// TTL cache over fully aggregated result sets.
///
/// Owns its state and is constructed once at process start with the
/// configured TTL and a clock handle. Each key gets an async mutex
/// slot, and the slot stays locked across the compute, which gives the
/// at-most-one-in-flight-compute-per-key guarantee: a second
/// concurrent requester for the same key parks on the slot, then
/// re-checks freshness and observes the first requester's entry
/// instead of recomputing. A stale entry is overwritten in place; a
/// failed compute stores nothing, so the next requester retries. There
/// is no eviction beyond the freshness check, so the map grows with
/// the number of distinct keys ever seen.
pub struct AggregationCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<String, Arc<Mutex<Option<CacheEntry>>>>>,
}

impl AggregationCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached result for `key` while fresh, otherwise runs
    /// `compute`, stores its output with the current timestamp and
    /// returns it.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> AggregateResult<CachedResult>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AggregateResult<(Vec<CanonicalOffer>, bool)>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(key.to_string()).or_default().clone()
        };

        let mut guard = slot.lock().await;
        if let Some(entry) = guard.as_ref() {
            if self.clock.now() - entry.created_at < self.ttl {
                tracing::debug!(key, "aggregation cache hit");
                return Ok(CachedResult {
                    data: entry.data.clone(),
                    partial: entry.partial,
                });
            }
            tracing::debug!(key, "aggregation cache entry stale, refreshing");
        } else {
            tracing::debug!(key, "aggregation cache miss");
        }

        let (data, partial) = compute().await?;
        let data = Arc::new(data);
        *guard = Some(CacheEntry {
            created_at: self.clock.now(),
            data: data.clone(),
            partial,
        });
        Ok(CachedResult { data, partial })
    }
}

#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(Utc::now()),
        }
    }

    pub(crate) fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::seconds(seconds);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
