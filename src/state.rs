use std::fmt::Display;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::search::PlanSearch;

/// Shared by every handler behind an `Arc`; never mutated after startup / 全局只读状态
pub struct AppState {
    pub search: PlanSearch,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(search: PlanSearch, config: AppConfig) -> Self {
        Self { search, config }
    }

    /// Build a 500 error, hiding the cause outside development mode / 构造500错误
    pub fn internal_error(&self, context: &'static str, err: impl Display) -> ApiError {
        tracing::error!("{}: {}", context, err);
        let message = if self.config.is_development() {
            err.to_string()
        } else {
            ApiError::REDACTED.to_string()
        };
        ApiError::Internal { context, message }
    }
}
