use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use super::types::*;
use crate::search::QuickSearchOptions;
use crate::state::AppState;

/// GET /cities - 城市列表（来自预计算分组）
pub async fn list_cities(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CitiesBody>> {
    let by_city = &state.search.index().search_optimization.by_city;

    let cities: Vec<CityEntry> = by_city
        .iter()
        .map(|(name, agg)| CityEntry {
            name: name.clone(),
            name_en: agg
                .city_en
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| name.clone()),
            total_plans: agg.count,
            characteristics: agg.characteristics.clone(),
            avg_building_height: agg
                .avg_building_height
                .clone()
                .filter(crate::utils::is_truthy)
                .unwrap_or_else(|| Value::String(UNKNOWN_HEIGHT.to_string())),
        })
        .collect();

    Json(ApiResponse::success(CitiesBody {
        count: cities.len(),
        cities,
    }))
}

/// GET /cities/:city/plans - 某城市的计划
pub async fn city_plans(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    query: Result<Query<CityPlansParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CityPlansBody>>, ApiError> {
    let Query(params) = query?;
    let options = QuickSearchOptions {
        city: Some(city.clone()),
        limit: Some(params.limit.unwrap_or(CITY_PLANS_LIMIT)),
        ..Default::default()
    };
    let plans = state.search.quick_search("", &options);

    Ok(Json(ApiResponse::success(CityPlansBody {
        city,
        count: plans.len(),
        plans,
    })))
}

fn insights_response(state: &AppState, city: Option<String>) -> Response {
    let insights = state.search.insights(city.as_deref());

    Json(ApiResponse::success(InsightsBody {
        city: city.unwrap_or_else(|| "all".to_string()),
        insights,
    }))
    .into_response()
}

/// GET /insights - 全库统计
pub async fn insights(State(state): State<Arc<AppState>>) -> Response {
    insights_response(&state, None)
}

/// GET /insights/:city - 城市统计
pub async fn city_insights(State(state): State<Arc<AppState>>, Path(city): Path<String>) -> Response {
    insights_response(&state, Some(city))
}
