pub mod offer;
pub mod provider;
pub mod query;

pub use offer::{CanonicalOffer, PriceBreakdown, RawOffer, TripType};
pub use provider::ProviderAdapter;
pub use query::SearchQuery;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Upstream API error {status} from {provider}")]
    UpstreamStatus { provider: String, status: u16 },
    #[error("Failed to reach {provider}: {message}")]
    Transport { provider: String, message: String },
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },
}

pub type ProviderResult<T> = Result<T, ProviderError>;
