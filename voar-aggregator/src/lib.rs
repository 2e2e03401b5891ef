pub mod cache;
pub mod dedupe;
pub mod normalize;
pub mod orchestrator;
pub mod rank;

pub use cache::{cache_key, AggregationCache, CachedResult, Clock, SystemClock};
pub use dedupe::dedupe;
pub use normalize::normalize;
pub use orchestrator::{FanoutPolicy, PageMeta, ResultPage, SearchOrchestrator};
pub use rank::{paginate, rank};

use voar_core::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Provider {provider} timed out after {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },

    #[error("All providers failed")]
    AllProvidersFailed,
}

pub type AggregateResult<T> = Result<T, AggregateError>;
