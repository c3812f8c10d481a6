use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::error::ApiError;
use super::types::*;
use crate::state::AppState;

/// GET /plans/:planNumber - 获取计划详情及推荐
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_number): Path<String>,
) -> Result<Response, ApiError> {
    let Some(plan) = state.search.plan(&plan_number) else {
        tracing::debug!("Plan not found: {}", plan_number);
        return Err(ApiError::PlanNotFound(plan_number));
    };

    let recommendations = state.search.recommendations(&plan_number);

    Ok(Json(ApiResponse::success(PlanBody {
        plan_number,
        plan,
        recommendations,
    }))
    .into_response())
}

/// GET /recommendations/:planNumber - 获取推荐
///
/// Unknown plan numbers yield an empty list, not a 404.
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(plan_number): Path<String>,
) -> Response {
    let recommendations = state.search.recommendations(&plan_number);

    Json(ApiResponse::success(RecommendationsBody {
        count: recommendations.len(),
        plan_number,
        recommendations,
    }))
    .into_response()
}
