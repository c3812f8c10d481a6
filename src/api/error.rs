use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::SearchError;

/// Handler error, rendered as a fixed JSON body / 接口错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Valid API key required")]
    Unauthorized,

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// `message` is already redacted unless running in development mode
    #[error("{context}: {message}")]
    Internal { context: &'static str, message: String },
}

impl ApiError {
    pub const REDACTED: &'static str = "Something went wrong";

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PlanNotFound(_) | ApiError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Unauthorized => json!({
                "error": "Unauthorized",
                "message": "Valid API key required"
            }),
            ApiError::PlanNotFound(plan_number) => json!({
                "error": "Plan not found",
                "planNumber": plan_number
            }),
            ApiError::DocumentNotFound(path) => json!({
                "error": "Document not found",
                "path": path
            }),
            ApiError::BadRequest(message) => json!({
                "error": "Invalid request",
                "message": message
            }),
            ApiError::Internal { context, message } => json!({
                "error": context,
                "message": message
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::PlanNotFound("1".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal { context: "Export failed", message: ApiError::REDACTED.into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_query_rejection_is_bad_request() {
        use axum::extract::Query;
        use axum::http::Uri;

        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            limit: Option<usize>,
        }

        let uri: Uri = "/search?limit=abc".parse().unwrap();
        let rejection = Query::<Params>::try_from_uri(&uri).unwrap_err();
        let err = ApiError::from(rejection);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::BadRequest(message) if message.starts_with("Failed to deserialize query string")));
    }

    #[test]
    fn test_search_error_is_bad_request() {
        let err: ApiError = SearchError::InvalidDate { field: "dateFrom", value: "x".into() }.into();
        assert_eq!(err.to_string(), "Invalid request: invalid dateFrom: x");
    }
}
