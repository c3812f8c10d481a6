use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::error::ApiError;
use super::types::*;
use crate::search::{export_results, ExportFormat, StructuredFilter};
use crate::state::AppState;

/// GET /search - 快速搜索
pub async fn quick_search(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchBody>>, ApiError> {
    let Query(params) = query?;
    let options = params.options();
    let results = state.search.quick_search(&params.query, &options);

    Ok(Json(ApiResponse::success(SearchBody {
        query: SearchParams { limit: options.limit, ..params },
        count: results.len(),
        results,
    })))
}

/// POST /search/structured - 结构化搜索
pub async fn structured_search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StructuredFilter>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(filters) = body?;
    let results = state.search.structured_search(&filters)?;

    Ok(Json(ApiResponse::success(StructuredSearchBody {
        count: results.len(),
        filters,
        results,
    }))
    .into_response())
}

/// GET /search/contextual - 带上下文的搜索
pub async fn contextual_search(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let options = params.options();
    let results = state.search.contextual_search(&params.query, &options);

    Ok(Json(ApiResponse::success(ContextualSearchBody {
        query: SearchParams { limit: options.limit, ..params },
        count: results.len(),
        results,
    }))
    .into_response())
}

/// POST /export - 导出搜索结果
///
/// The body is read as JSON whatever the content type; an empty body means
/// an unfiltered JSON export.
pub async fn export(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let req: ExportRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ExportRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(format!("Invalid export request: {}", e)))?
    };

    let format = ExportFormat::from(req.format.as_deref().unwrap_or("json"));
    let query = req.query.unwrap_or_default();

    let results = state.search.quick_search(&query, &req.options);
    let exported = export_results(&results, format).map_err(|e| state.internal_error("Export failed", e))?;

    tracing::info!("Exported {} results as {}", results.len(), format.extension());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        exported,
    )
        .into_response())
}
