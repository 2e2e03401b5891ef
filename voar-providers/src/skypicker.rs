use async_trait::async_trait;
use serde_json::Value;

use voar_core::{ProviderAdapter, ProviderError, ProviderResult, RawOffer, SearchQuery};

/// Provider tag stamped on every record this adapter emits.
pub const PROVIDER_NAME: &str = "skypicker_public";

const DEFAULT_BASE_URL: &str = "https://api.skypicker.com/flights";
const DEFAULT_LIMIT: u32 = 200;
const MAX_LIMIT: u32 = 500;

#[derive(Debug, Clone)]
pub struct SkypickerConfig {
    pub base_url: String,
    /// Destination country scope, e.g. "BR".
    pub country_to: String,
    pub currency: String,
    pub partner: String,
}

impl Default for SkypickerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country_to: "BR".to_string(),
            currency: "BRL".to_string(),
            partner: "picky".to_string(),
        }
    }
}

/// Adapter for the Skypicker public flights API.
pub struct SkypickerProvider {
    client: reqwest::Client,
    config: SkypickerConfig,
}

impl SkypickerProvider {
    pub fn new(config: SkypickerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        ProviderError::Transport {
            provider: PROVIDER_NAME.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for SkypickerProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_offers(&self, query: &SearchQuery) -> ProviderResult<Vec<RawOffer>> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let params = [
            ("fly_from", query.origins.join(",")),
            ("country_to", self.config.country_to.clone()),
            ("date_from", iso_to_upstream_date(&query.from_date)),
            ("date_to", iso_to_upstream_date(&query.to_date)),
            ("curr", self.config.currency.clone()),
            ("limit", limit.to_string()),
            ("partner", self.config.partner.clone()),
        ];

        tracing::debug!(url = %self.config.base_url, ?params, "fetching upstream offers");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "upstream returned an error");
            return Err(ProviderError::UpstreamStatus {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Value = response.json().await.map_err(|e| self.transport_error(e))?;

        let items = envelope
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::MalformedResponse {
                provider: PROVIDER_NAME.to_string(),
                message: "missing `data` array in response".to_string(),
            })?;

        let currency_hint = envelope
            .get("currency")
            .and_then(Value::as_str)
            .map(str::to_string);

        let offers = items
            .iter()
            .map(|item| {
                let mut raw = RawOffer::new(PROVIDER_NAME, item.clone());
                raw.currency_hint = currency_hint.clone();
                raw
            })
            .collect();

        Ok(offers)
    }
}

/// The upstream expects `DD/MM/YYYY`; queries carry ISO `YYYY-MM-DD`.
/// Anything that does not look like an ISO date passes through as-is.
fn iso_to_upstream_date(iso: &str) -> String {
    let parts: Vec<&str> = iso.split('-').collect();
    match parts.as_slice() {
        [year, month, day] if year.len() == 4 => format!("{}/{}/{}", day, month, year),
        _ => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_conversion() {
        assert_eq!(iso_to_upstream_date("2026-04-01"), "01/04/2026");
        assert_eq!(iso_to_upstream_date("2026-12-31"), "31/12/2026");
    }

    #[test]
    fn test_non_iso_date_passes_through() {
        assert_eq!(iso_to_upstream_date("01/04/2026"), "01/04/2026");
        assert_eq!(iso_to_upstream_date("garbage"), "garbage");
    }
}
