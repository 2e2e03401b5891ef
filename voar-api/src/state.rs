use std::sync::Arc;
use std::time::Duration;

use voar_aggregator::{AggregationCache, SearchOrchestrator, SystemClock};
use voar_core::ProviderAdapter;
use voar_providers::{SkypickerConfig, SkypickerProvider, SyntheticProvider};

use crate::config::Config;

/// Query defaults applied when a request omits or mangles a parameter.
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub origins: String,
    pub from_date: String,
    pub to_date: String,
    pub per_page: u32,
    pub default_limit: u32,
    pub max_limit: u32,
}

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SearchOrchestrator>,
    /// Adapter serving the single-provider `/voos` route.
    pub primary: Arc<dyn ProviderAdapter>,
    pub defaults: SearchDefaults,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let skypicker: Arc<dyn ProviderAdapter> =
            Arc::new(SkypickerProvider::new(SkypickerConfig {
                base_url: config.skypicker.base_url.clone(),
                country_to: config.skypicker.country_to.clone(),
                currency: config.skypicker.currency.clone(),
                partner: config.skypicker.partner.clone(),
            }));

        let mut providers: Vec<Arc<dyn ProviderAdapter>> = config
            .synthetic
            .providers
            .iter()
            .map(|name| {
                Arc::new(SyntheticProvider::new(
                    name.clone(),
                    config.synthetic.offers_per_provider,
                    config.synthetic.max_latency_ms,
                )) as Arc<dyn ProviderAdapter>
            })
            .collect();
        if config.fanout.include_skypicker {
            providers.push(skypicker.clone());
        }

        let cache = AggregationCache::new(config.cache.ttl_secs, Arc::new(SystemClock));
        let orchestrator = SearchOrchestrator::new(
            providers,
            cache,
            config.fanout.policy,
            Duration::from_secs(config.fanout.adapter_timeout_secs),
        );

        Self {
            orchestrator: Arc::new(orchestrator),
            primary: skypicker,
            defaults: SearchDefaults {
                origins: config.search.origins.clone(),
                from_date: config.search.from_date.clone(),
                to_date: config.search.to_date.clone(),
                per_page: config.search.per_page,
                default_limit: config.search.default_limit,
                max_limit: config.search.max_limit,
            },
        }
    }
}
