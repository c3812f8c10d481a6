use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

use super::error::ApiError;
use super::types::*;
use crate::auth::API_KEY_HEADER;
use crate::state::AppState;

/// Route roster reported by the 404 fallback / 可用接口列表
pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /search",
    "POST /search/structured",
    "GET /search/contextual",
    "GET /plans/:planNumber",
    "GET /cities",
    "GET /cities/:city/plans",
    "GET /recommendations/:planNumber",
    "GET /insights/:city?",
    "POST /export",
    "GET /stats",
];

/// GET /health - 健康检查（无需认证）
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Israeli Planning Repository API",
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "timestamp": Utc::now().to_rfc3339(),
        "plans_loaded": state.search.index().quick_access.len(),
        "endpoints": {
            "/search": "Quick search in planning database",
            "/search/structured": "Advanced filtered search",
            "/search/contextual": "Quick search with city context and related plans",
            "/plans/:planNumber": "Get specific plan details",
            "/cities": "List all cities",
            "/cities/:city/plans": "Get plans for specific city",
            "/recommendations/:planNumber": "Get plan recommendations",
            "/insights": "Get repository insights",
            "/insights/:city": "Get city-specific insights",
            "/export": "Export search results as JSON, CSV or Markdown",
            "/stats": "Repository statistics"
        },
        "usage": {
            "API-Key": format!("Include {} header or ?api_key=KEY parameter", API_KEY_HEADER),
            "Example": "/search?query=אור יהודה&api_key=your-key"
        }
    }))
}

/// GET / - 返回仓库说明文档
pub async fn root_document(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let path = state.config.get_root_document_path();

    let content = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!("Root document unavailable {:?}: {}", path, e);
        ApiError::DocumentNotFound(path.display().to_string())
    })?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let content_type = if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    };

    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

/// GET /stats - 仓库统计
pub async fn stats(State(state): State<Arc<AppState>>) -> Response {
    let index = state.search.index();
    let repository_info = index.repository_info.as_ref();

    Json(ApiResponse::success(StatsBody {
        stats: Stats {
            repository_info,
            processing_status: repository_info.and_then(|info| info.processing_status.as_ref()),
            total_cities: index.search_optimization.by_city.len(),
            plans_by_status: index.search_optimization.by_status.as_ref(),
            plans_by_type: index.search_optimization.by_type.as_ref(),
            recent_update: Utc::now().to_rfc3339(),
        },
    }))
    .into_response()
}

/// Fallback for unmatched routes / 未匹配路由
pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::debug!("No route for {} {}", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "message": format!("{} {} does not exist", method, uri),
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
        .into_response()
}

/// Turn a handler panic into the 500 body / 处理器崩溃时返回500
pub fn panic_response(err: Box<dyn Any + Send + 'static>, development: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    tracing::error!("Server Error: {}", detail);

    let message = if development { detail } else { ApiError::REDACTED.to_string() };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "message": message
        })),
    )
        .into_response()
}
