//! Shared-secret API key check / API密钥校验
//!
//! The key is read from the `x-api-key` header, then the `api_key` query
//! parameter, and compared by exact string equality.

use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

// 从请求头或查询参数中提取API密钥
pub fn extract_api_key(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<ApiKeyQuery>::try_from_uri(uri)
            .ok()
            .and_then(|Query(q)| q.api_key)
            .filter(|v| !v.is_empty())
    })
}

pub fn is_authorized(provided: Option<&str>, expected: &str) -> bool {
    matches!(provided, Some(key) if key == expected)
}

/// Middleware for protected routes / 受保护路由的中间件
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = extract_api_key(req.headers(), req.uri());

    if !is_authorized(provided.as_deref(), &state.config.auth.api_key) {
        tracing::debug!("Rejected {} {}: missing or invalid API key", req.method(), req.uri().path());
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
