use serde::Deserialize;
use std::env;

use voar_aggregator::FanoutPolicy;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fanout: FanoutConfig,
    #[serde(default)]
    pub skypicker: SkypickerSettings,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Freshness window for aggregated result sets, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Comma-separated default origin codes.
    #[serde(default = "default_origins")]
    pub origins: String,
    #[serde(default = "default_from_date")]
    pub from_date: String,
    #[serde(default = "default_to_date")]
    pub to_date: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FanoutConfig {
    #[serde(default = "default_policy")]
    pub policy: FanoutPolicy,
    #[serde(default = "default_adapter_timeout_secs")]
    pub adapter_timeout_secs: u64,
    /// Whether the real upstream adapter joins the fan-out roster in
    /// addition to serving the single-provider route.
    #[serde(default)]
    pub include_skypicker: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SkypickerSettings {
    #[serde(default = "default_skypicker_url")]
    pub base_url: String,
    #[serde(default = "default_country_to")]
    pub country_to: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_partner")]
    pub partner: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyntheticConfig {
    #[serde(default = "default_synthetic_names")]
    pub providers: Vec<String>,
    #[serde(default = "default_offers_per_provider")]
    pub offers_per_provider: u32,
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u64,
}

fn default_port() -> u16 { 3000 }
fn default_ttl_secs() -> u64 { 300 }
fn default_origins() -> String { "CNF".to_string() }
fn default_from_date() -> String { "2026-04-01".to_string() }
fn default_to_date() -> String { "2026-04-30".to_string() }
fn default_per_page() -> u32 { 20 }
fn default_limit() -> u32 { 200 }
fn default_max_limit() -> u32 { 500 }
fn default_policy() -> FanoutPolicy { FanoutPolicy::FailFast }
fn default_adapter_timeout_secs() -> u64 { 10 }
fn default_skypicker_url() -> String { "https://api.skypicker.com/flights".to_string() }
fn default_country_to() -> String { "BR".to_string() }
fn default_currency() -> String { "BRL".to_string() }
fn default_partner() -> String { "picky".to_string() }
fn default_offers_per_provider() -> u32 { 8 }
fn default_max_latency_ms() -> u64 { 400 }

fn default_synthetic_names() -> Vec<String> {
    vec![
        "aerolinhas_sim".to_string(),
        "voa_brasil_sim".to_string(),
        "sul_express_sim".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: default_ttl_secs() }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            origins: default_origins(),
            from_date: default_from_date(),
            to_date: default_to_date(),
            per_page: default_per_page(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            adapter_timeout_secs: default_adapter_timeout_secs(),
            include_skypicker: false,
        }
    }
}

impl Default for SkypickerSettings {
    fn default() -> Self {
        Self {
            base_url: default_skypicker_url(),
            country_to: default_country_to(),
            currency: default_currency(),
            partner: default_partner(),
        }
    }
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            providers: default_synthetic_names(),
            offers_per_provider: default_offers_per_provider(),
            max_latency_ms: default_max_latency_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            // Optional file, overridable per environment
            .add_source(config::File::with_name("config/default").required(false))
            // Eg. `VOAR_SERVER__PORT=8080` or `VOAR_FANOUT__POLICY=collect_available`
            .add_source(config::Environment::with_prefix("VOAR").separator("__"))
            .build()?;

        let mut cfg: Config = s.try_deserialize()?;

        // Legacy env names the original deployment honored.
        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                cfg.server.port = port;
            }
        }
        if let Ok(ttl) = env::var("CACHE_TTL_SEC") {
            if let Ok(ttl) = ttl.parse() {
                cfg.cache.ttl_secs = ttl;
            }
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.cache.ttl_secs, 300);
        assert_eq!(cfg.search.origins, "CNF");
        assert_eq!(cfg.search.per_page, 20);
        assert_eq!(cfg.search.max_limit, 500);
        assert_eq!(cfg.fanout.policy, FanoutPolicy::FailFast);
        assert_eq!(cfg.synthetic.providers.len(), 3);
    }
}
