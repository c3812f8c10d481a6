//! Search request and result shapes / 搜索请求与结果结构

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::PlanRecord;

/// Default quick search result count / 默认返回条数
pub const DEFAULT_LIMIT: usize = 20;

/// Quick search options / 快速搜索选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickSearchOptions {
    /// Native or English city name / 城市（原名或英文名）
    pub city: Option<String>,
    /// Native or English status / 状态
    pub status: Option<String>,
    /// Native or English plan type / 计划类型
    pub plan_type: Option<String>,
    /// Maximum number of results, defaults to 20 / 最大返回条数
    pub limit: Option<usize>,
}

impl QuickSearchOptions {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Projected quick search result / 快速搜索结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub plan_number: String,
    pub city: String,
    pub city_en: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: Option<String>,
    pub keywords: Vec<String>,
    pub summary: String,
    pub details_path: Option<String>,
    pub last_updated: Option<String>,
    pub processing_complete: bool,
}

impl PlanSummary {
    pub fn from_plan(plan: &PlanRecord) -> Self {
        Self {
            plan_number: plan.plan_number.clone(),
            city: plan.city.clone(),
            city_en: plan.city_en.clone(),
            status: plan.status.clone(),
            plan_type: plan.plan_type().map(str::to_string),
            keywords: plan.keywords.clone(),
            summary: quick_summary(plan),
            details_path: plan.path.clone(),
            last_updated: plan.last_updated.clone(),
            processing_complete: plan.processing_complete,
        }
    }
}

/// One-line summary: "{type} ב{city} - {status}" / 一行摘要
pub fn quick_summary(plan: &PlanRecord) -> String {
    let plan_type = plan.plan_type().unwrap_or("תוכנית");
    let status = plan.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("בעיבוד");
    format!("{} ב{} - {}", plan_type, plan.city, status)
}

/// Structured search filter; every supplied field is ANDed / 结构化过滤条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructuredFilter {
    pub city_code: Option<Value>,
    /// Acceptable statuses, native or English / 可接受的状态列表
    pub status_list: Option<Vec<String>>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// true: must have documents, false: must not, absent: either / 文档存在性
    pub has_documents: Option<bool>,
    /// Reserved, not applied / 保留字段
    pub document_types: Option<Value>,
}

/// Recommended plan with its similarity score / 推荐结果
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    #[serde(flatten)]
    pub plan: &'a PlanRecord,
    pub score: u32,
}

/// Analytics over the whole index or one city / 统计分析
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights<'a> {
    pub total_plans: usize,
    /// completed / total, null for an empty set / 完成率
    pub processing_rate: Option<f64>,
    pub status_distribution: BTreeMap<String, usize>,
    pub type_distribution: BTreeMap<String, usize>,
    pub year_distribution: BTreeMap<String, usize>,
    pub recent_plans: Vec<&'a PlanRecord>,
}

/// City-level context for a plan / 计划所在城市的上下文
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContext {
    pub city_total_plans: usize,
    pub city_approved_plans: usize,
    pub similar_type_plans: usize,
    pub city_dominant_type: String,
}

/// Quick search result enriched with context / 带上下文的搜索结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualResult<'a> {
    #[serde(flatten)]
    pub summary: PlanSummary,
    pub context: PlanContext,
    pub related_plans: Vec<Recommendation<'a>>,
}
