use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An offer as produced by one provider, before normalization.
///
/// The payload shape varies per provider and carries no invariants
/// beyond "the provider produced it". `currency_hint` is the
/// response-envelope currency, used as a default when an item carries
/// none of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOffer {
    pub provider: String,
    pub currency_hint: Option<String>,
    pub payload: Value,
}

impl RawOffer {
    pub fn new(provider: impl Into<String>, payload: Value) -> Self {
        Self {
            provider: provider.into(),
            currency_hint: None,
            payload,
        }
    }

    pub fn with_currency_hint(mut self, currency: impl Into<String>) -> Self {
        self.currency_hint = Some(currency.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

/// Base/tax split as reported by the upstream, when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub base: Option<f64>,
    pub tax: Option<f64>,
    pub currency: Option<String>,
}

/// The normalized, provider-agnostic representation of one offer.
///
/// `id` is stable and unique per distinct physical offer. Two records
/// from different providers describing the same flight and price are
/// not required to collide: dedup is per-id, never semantic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalOffer {
    pub id: String,
    pub provider: String,
    pub airline: Option<String>,
    pub flight_numbers: Vec<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub return_date: Option<String>,
    pub trip_type: TripType,
    pub stops: u32,
    pub stop_locations: Vec<String>,
    pub is_direct: bool,
    pub duration_minutes: Option<i64>,
    pub total_price: Option<f64>,
    pub currency: String,
    pub price_breakdown: Option<PriceBreakdown>,
    pub booking_url: Option<String>,
}
