use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use voar_aggregator::{dedupe, normalize, rank};
use voar_core::{CanonicalOffer, SearchQuery};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/voos", get(voos))
}

#[derive(Debug, Deserialize)]
struct VoosParams {
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
struct VoosMeta {
    origin_query: Vec<String>,
    date_range_searched: [String; 2],
    results_count: usize,
    sorted_by: &'static str,
}

#[derive(Debug, Serialize)]
struct VoosResponse {
    meta: VoosMeta,
    results: Vec<CanonicalOffer>,
}

/// GET /voos
/// Single-provider variant: one fetch against the primary upstream,
/// sorted by price ascending, deduped. No aggregation cache involved.
async fn voos(
    State(state): State<AppState>,
    Query(params): Query<VoosParams>,
) -> Result<Json<VoosResponse>, AppError> {
    let defaults = &state.defaults;
    let limit = params
        .limit
        .as_deref()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(defaults.default_limit)
        .min(defaults.max_limit);

    let origins: Vec<String> = defaults
        .origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let query = SearchQuery::new(
        origins,
        defaults.from_date.clone(),
        defaults.to_date.clone(),
    )
    .with_limit(limit);

    let raw = state.primary.fetch_offers(&query).await?;
    // Sorted before dedup, so a duplicated id keeps its cheapest record.
    let results = dedupe(rank(raw.iter().map(normalize).collect()));

    Ok(Json(VoosResponse {
        meta: VoosMeta {
            origin_query: query.origins.clone(),
            date_range_searched: [query.from_date.clone(), query.to_date.clone()],
            results_count: results.len(),
            sorted_by: "price_asc",
        },
        results,
    }))
}
