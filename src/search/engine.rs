//! Search engine - linear scan over the in-memory master index / 搜索引擎
//!
//! All operations are pure reads returning freshly built vectors, so one
//! `PlanSearch` can be shared by every request handler without locking.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::schema::{
    ContextualResult, PlanContext, PlanSummary, QuickSearchOptions, StructuredFilter,
};
use super::tokenizer::{matches_any_term, tokenize_query};
use crate::models::{MasterIndex, PlanRecord};
use crate::utils::parse_date;

/// Status of an approved plan / 已批准状态
pub const APPROVED_STATUS: &str = "מאושר";
/// Fallback type name / 默认类型名
pub const OTHER_TYPE: &str = "אחר";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid {field}: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Search engine / 搜索引擎
pub struct PlanSearch {
    index: MasterIndex,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Compare JSON scalars by their text form, so `"5000"` matches `5000` / 按文本比较
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_bound(field: &'static str, raw: &Option<String>) -> Result<Option<DateTime<Utc>>, SearchError> {
    match present(raw) {
        None => Ok(None),
        Some(text) => parse_date(text).map(Some).ok_or_else(|| SearchError::InvalidDate {
            field,
            value: text.to_string(),
        }),
    }
}

/// Completed first, then most recently updated; undated plans last / 排序
pub(crate) fn sort_by_freshness(plans: &mut Vec<&PlanRecord>, completed_first: bool) {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &PlanRecord)> =
        plans.iter().map(|p| (p.last_updated_at(), *p)).collect();

    keyed.sort_by(|(a_date, a), (b_date, b)| {
        let by_completion = if completed_first {
            b.processing_complete.cmp(&a.processing_complete)
        } else {
            std::cmp::Ordering::Equal
        };
        by_completion.then_with(|| b_date.cmp(a_date))
    });

    *plans = keyed.into_iter().map(|(_, p)| p).collect();
}

impl PlanSearch {
    pub fn new(index: MasterIndex) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &MasterIndex {
        &self.index
    }

    pub fn plan(&self, plan_number: &str) -> Option<&PlanRecord> {
        self.index.plan(plan_number)
    }

    /// Plans in a city, native or English name / 某城市的计划
    pub(crate) fn city_plans<'a, 'c>(&'a self, city: &'c str) -> impl Iterator<Item = &'a PlanRecord> + 'c
    where
        'a: 'c,
    {
        self.index.plans().filter(move |p| p.in_city(city))
    }

    /// Quick search / 快速搜索
    ///
    /// Exact-match filters first, then OR over query terms, then sort by
    /// (completion desc, last update desc) and truncate.
    pub fn quick_search(&self, query: &str, options: &QuickSearchOptions) -> Vec<PlanSummary> {
        let mut results: Vec<&PlanRecord> = self.index.plans().collect();

        if let Some(city) = present(&options.city) {
            results.retain(|p| p.in_city(city));
        }
        if let Some(status) = present(&options.status) {
            results.retain(|p| p.has_status(status));
        }
        if let Some(plan_type) = present(&options.plan_type) {
            results.retain(|p| p.has_type(plan_type));
        }

        let terms = tokenize_query(query);
        if !terms.is_empty() {
            results.retain(|p| matches_any_term(p, &terms));
        }

        sort_by_freshness(&mut results, true);

        tracing::debug!("Quick search {:?}: {} matches, limit {}", query, results.len(), options.limit());

        results
            .into_iter()
            .take(options.limit())
            .map(PlanSummary::from_plan)
            .collect()
    }

    /// Structured search, AND of all supplied filters, no limit / 结构化搜索
    pub fn structured_search(&self, filter: &StructuredFilter) -> Result<Vec<&PlanRecord>, SearchError> {
        let date_from = parse_bound("dateFrom", &filter.date_from)?;
        let date_to = parse_bound("dateTo", &filter.date_to)?;
        let city_code = filter.city_code.as_ref().and_then(value_text);

        let results = self
            .index
            .plans()
            .filter(|plan| match &city_code {
                Some(code) => plan.city_code.as_ref().and_then(value_text).as_deref() == Some(code.as_str()),
                None => true,
            })
            .filter(|plan| match &filter.status_list {
                Some(statuses) => statuses.iter().any(|s| plan.has_status(s)),
                None => true,
            })
            .filter(|plan| {
                if date_from.is_none() && date_to.is_none() {
                    return true;
                }
                let Some(date) = plan.effective_date() else {
                    return false;
                };
                date_from.map_or(true, |from| date >= from) && date_to.map_or(true, |to| date <= to)
            })
            .filter(|plan| match filter.has_documents {
                Some(wanted) => plan.has_documents() == wanted,
                None => true,
            })
            .collect::<Vec<_>>();

        tracing::debug!("Structured search: {} matches", results.len());
        Ok(results)
    }

    /// Most frequent type among a city's plans / 城市主导类型
    pub fn city_dominant_type(&self, city: &str) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for plan in self.city_plans(city) {
            let plan_type = plan.plan_type().unwrap_or(OTHER_TYPE);
            match counts.iter_mut().find(|(t, _)| *t == plan_type) {
                Some((_, n)) => *n += 1,
                None => counts.push((plan_type, 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (plan_type, n) in counts {
            if best.map_or(true, |(_, max)| n > max) {
                best = Some((plan_type, n));
            }
        }
        best.map(|(t, _)| t.to_string()).unwrap_or_else(|| OTHER_TYPE.to_string())
    }

    /// City-level context for a plan / 计划上下文
    pub fn plan_context(&self, plan: &PlanRecord) -> PlanContext {
        let city_plans: Vec<&PlanRecord> = self.city_plans(&plan.city).collect();
        let plan_type = plan.plan_type();

        PlanContext {
            city_total_plans: city_plans.len(),
            city_approved_plans: city_plans
                .iter()
                .filter(|p| p.status.as_deref() == Some(APPROVED_STATUS))
                .count(),
            similar_type_plans: city_plans
                .iter()
                .filter(|p| plan_type.is_some() && p.plan_type() == plan_type)
                .count(),
            city_dominant_type: self.city_dominant_type(&plan.city),
        }
    }

    /// Quick search enriched with city context and related plans / 上下文搜索
    pub fn contextual_search(&self, query: &str, options: &QuickSearchOptions) -> Vec<ContextualResult<'_>> {
        self.quick_search(query, options)
            .into_iter()
            .filter_map(|summary| {
                let plan = self.plan(&summary.plan_number)?;
                let mut related_plans = self.recommendations(&summary.plan_number);
                related_plans.truncate(3);
                Some(ContextualResult {
                    context: self.plan_context(plan),
                    related_plans,
                    summary,
                })
            })
            .collect()
    }
}
