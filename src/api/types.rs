use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PlanRecord, RepositoryInfo};
use crate::search::schema::DEFAULT_LIMIT;
use crate::search::{
    ContextualResult, Insights, PlanSummary, QuickSearchOptions, Recommendation, StructuredFilter,
};

/// Default page size for `/cities/:city/plans` / 城市计划列表默认条数
pub const CITY_PLANS_LIMIT: usize = 50;

/// Fallback building height label / 默认建筑高度
pub const UNKNOWN_HEIGHT: &str = "לא ידוע";

/// API响应结构: `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> ApiResponse<T> {
    pub fn success(body: T) -> Self {
        Self { success: true, body }
    }
}

/// `GET /search` query / 快速搜索参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub city: Option<String>,
    pub status: Option<String>,
    pub plan_type: Option<String>,
    pub limit: Option<usize>,
}

impl SearchParams {
    pub fn options(&self) -> QuickSearchOptions {
        QuickSearchOptions {
            city: self.city.clone(),
            status: self.status.clone(),
            plan_type: self.plan_type.clone(),
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub query: SearchParams,
    pub count: usize,
    pub results: Vec<PlanSummary>,
}

#[derive(Debug, Serialize)]
pub struct StructuredSearchBody<'a> {
    pub filters: StructuredFilter,
    pub count: usize,
    pub results: Vec<&'a PlanRecord>,
}

#[derive(Debug, Serialize)]
pub struct ContextualSearchBody<'a> {
    pub query: SearchParams,
    pub count: usize,
    pub results: Vec<ContextualResult<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBody<'a> {
    pub plan_number: String,
    pub plan: &'a PlanRecord,
    pub recommendations: Vec<Recommendation<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsBody<'a> {
    pub plan_number: String,
    pub count: usize,
    pub recommendations: Vec<Recommendation<'a>>,
}

/// One entry of the city roster / 城市列表项
#[derive(Debug, Serialize)]
pub struct CityEntry {
    pub name: String,
    pub name_en: String,
    pub total_plans: u64,
    pub characteristics: Vec<String>,
    pub avg_building_height: Value,
}

#[derive(Debug, Serialize)]
pub struct CitiesBody {
    pub count: usize,
    pub cities: Vec<CityEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityPlansParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CityPlansBody {
    pub city: String,
    pub count: usize,
    pub plans: Vec<PlanSummary>,
}

#[derive(Debug, Serialize)]
pub struct InsightsBody<'a> {
    pub city: String,
    pub insights: Insights<'a>,
}

/// `POST /export` body / 导出请求
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub query: Option<String>,
    pub format: Option<String>,
    pub options: QuickSearchOptions,
}

#[derive(Debug, Serialize)]
pub struct Stats<'a> {
    pub repository_info: Option<&'a RepositoryInfo>,
    pub processing_status: Option<&'a Value>,
    pub total_cities: usize,
    pub plans_by_status: Option<&'a Value>,
    pub plans_by_type: Option<&'a Value>,
    pub recent_update: String,
}

#[derive(Debug, Serialize)]
pub struct StatsBody<'a> {
    pub stats: Stats<'a>,
}
