use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

use voar_core::{ProviderAdapter, ProviderResult, RawOffer, SearchQuery};

const DESTINATIONS: &[(&str, &str)] = &[
    ("GRU", "São Paulo"),
    ("GIG", "Rio de Janeiro"),
    ("BSB", "Brasília"),
    ("SSA", "Salvador"),
    ("REC", "Recife"),
    ("FOR", "Fortaleza"),
    ("POA", "Porto Alegre"),
    ("CWB", "Curitiba"),
];

const AIRLINES: &[&str] = &["G3", "AD", "LA", "2Z"];

/// Generates randomized placeholder offers tagged with its own
/// provider identity, sleeping a random latency first to simulate
/// upstream I/O. Payloads follow the same envelope-item shape the real
/// upstream uses so one normalizer handles every provider.
pub struct SyntheticProvider {
    name: String,
    offer_count: u32,
    max_latency_ms: u64,
}

impl SyntheticProvider {
    pub fn new(name: impl Into<String>, offer_count: u32, max_latency_ms: u64) -> Self {
        Self {
            name: name.into(),
            offer_count,
            max_latency_ms,
        }
    }

    fn generate_offers(&self, query: &SearchQuery) -> Vec<RawOffer> {
        let mut rng = rand::thread_rng();
        let origin = query
            .origins
            .first()
            .cloned()
            .unwrap_or_else(|| "CNF".to_string());
        // Keep generated departures inside the queried month.
        let month_prefix = query.from_date.get(..7).unwrap_or("2026-04");

        (0..self.offer_count)
            .map(|_| {
                let (dest_code, dest_city) = DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())];
                let airline = AIRLINES[rng.gen_range(0..AIRLINES.len())];
                let departure = format!(
                    "{}-{:02}T{:02}:{:02}:00.000Z",
                    month_prefix,
                    rng.gen_range(1..=28),
                    rng.gen_range(5..23),
                    rng.gen_range(0..60),
                );
                let base = rng.gen_range(120.0..1800.0_f64);
                let tax = rng.gen_range(20.0..180.0_f64);
                let legs = rng.gen_range(1..=3);
                let route: Vec<_> = (0..legs)
                    .map(|leg| {
                        json!({
                            "airline": airline,
                            "flight_no": rng.gen_range(1000..9999),
                            "cityTo": if leg == legs - 1 { dest_city } else {
                                DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())].1
                            },
                        })
                    })
                    .collect();

                let payload = json!({
                    "id": format!("{}-{}", self.name, Uuid::new_v4()),
                    "price": ((base + tax) * 100.0).round() / 100.0,
                    "price_breakdown": {
                        "base": (base * 100.0).round() / 100.0,
                        "tax": (tax * 100.0).round() / 100.0,
                        "currency": "BRL",
                    },
                    "flyFrom": origin,
                    "cityFrom": "Belo Horizonte",
                    "flyTo": dest_code,
                    "cityTo": dest_city,
                    "local_departure": departure,
                    "airlines": [airline],
                    "route": route,
                    "duration": { "total": rng.gen_range(3600..28_800) },
                    "deep_link": format!("https://example.invalid/book/{}/{}", self.name, dest_code),
                });

                RawOffer::new(self.name.clone(), payload).with_currency_hint("BRL")
            })
            .collect()
    }
}

#[async_trait]
impl ProviderAdapter for SyntheticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_offers(&self, query: &SearchQuery) -> ProviderResult<Vec<RawOffer>> {
        let latency = {
            let mut rng = rand::thread_rng();
            Duration::from_millis(rng.gen_range(20..=self.max_latency_ms.max(21)))
        };
        tokio::time::sleep(latency).await;

        let offers = self.generate_offers(query);
        tracing::debug!(
            provider = %self.name,
            count = offers.len(),
            latency_ms = latency.as_millis() as u64,
            "synthetic offers generated"
        );
        Ok(offers)
    }
}
