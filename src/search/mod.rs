//! Search module - read-only queries over the master index / 搜索模块
//!
//! - Quick search: filters + OR keyword match, ranked and truncated
//! - Structured search: AND of filters, full records, no limit
//! - Recommendations, insights, contextual search
//! - Export of quick search results

pub mod engine;
pub mod export;
pub mod insights;
pub mod recommend;
pub mod schema;
pub mod tokenizer;

pub use engine::{PlanSearch, SearchError};
pub use export::{export_results, ExportError, ExportFormat};
pub use schema::{
    ContextualResult, Insights, PlanContext, PlanSummary, QuickSearchOptions, Recommendation,
    StructuredFilter,
};
