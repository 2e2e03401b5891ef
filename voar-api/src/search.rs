use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use voar_aggregator::ResultPage;
use voar_core::SearchQuery;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

/// All parameters arrive as raw strings so a non-numeric `page` or
/// `per_page` falls back to its default instead of rejecting the
/// request.
#[derive(Debug, Deserialize)]
struct SearchParams {
    origins: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
}

/// GET /search
/// Aggregated, cached, paginated offers across every configured provider.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ResultPage>, AppError> {
    let defaults = &state.defaults;

    let origins_param = params
        .origins
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| defaults.origins.clone());
    let origins: Vec<String> = origins_param
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let query = SearchQuery::new(
        origins,
        params
            .from_date
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults.from_date.clone()),
        params
            .to_date
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| defaults.to_date.clone()),
    );

    let page = lenient_number(params.page.as_deref()).unwrap_or(1);
    let per_page = lenient_number(params.per_page.as_deref()).unwrap_or(defaults.per_page);

    let result = state.orchestrator.search(&query, page, per_page).await?;
    Ok(Json(result))
}

fn lenient_number(value: Option<&str>) -> Option<u32> {
    value.and_then(|s| s.trim().parse().ok()).filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_number_rejects_junk_and_zero() {
        assert_eq!(lenient_number(Some("3")), Some(3));
        assert_eq!(lenient_number(Some(" 7 ")), Some(7));
        assert_eq!(lenient_number(Some("abc")), None);
        assert_eq!(lenient_number(Some("0")), None);
        assert_eq!(lenient_number(Some("-2")), None);
        assert_eq!(lenient_number(None), None);
    }
}
