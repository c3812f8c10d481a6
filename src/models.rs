//! Master index data model / 主索引数据模型
//!
//! Every field is optional on input; unknown fields are kept in `extra`
//! so full-record responses echo the document as it was indexed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::utils::{
    is_truthy, lenient_bool, lenient_map, lenient_opt_string, lenient_string, lenient_strings, lenient_u64,
    parse_date,
};

/// One urban-planning record / 单条规划记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub plan_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub city_en: Option<String>,
    /// Municipal code, string or number in the source / 城市代码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub status_en: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub plan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub type_en: Option<String>,
    /// Legacy type field, doubles as the free-text description / 旧版类型字段（描述）
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub mahut: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<PlanDocuments>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub status_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub processing_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document availability sub-mapping / 文档可用性
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanDocuments {
    /// Regulations / 条例
    #[serde(skip_serializing_if = "Option::is_none")]
    pub takanon: Option<Value>,
    /// Drawings / 图纸
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasritim: Option<Value>,
    /// Appendices / 附件
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nispachim: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanDocuments {
    /// At least one of the three tracked document kinds is present / 是否存在任一主要文档
    pub fn has_required(&self) -> bool {
        [&self.takanon, &self.tasritim, &self.nispachim]
            .into_iter()
            .any(|doc| doc.as_ref().map(is_truthy).unwrap_or(false))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl PlanRecord {
    /// Canonical type: `type`, then legacy `mahut` / 规范类型
    pub fn plan_type(&self) -> Option<&str> {
        non_empty(&self.plan_type).or_else(|| non_empty(&self.mahut))
    }

    /// Free-text description field / 描述字段
    pub fn description(&self) -> &str {
        self.mahut.as_deref().unwrap_or("")
    }

    /// Status date, falling back to last update / 状态日期或最后更新时间
    pub fn date_hint(&self) -> Option<&str> {
        non_empty(&self.status_date).or_else(|| non_empty(&self.last_updated))
    }

    /// Parsed status date or last update / 解析后的日期
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.date_hint().and_then(parse_date)
    }

    /// Parsed last update / 解析后的最后更新时间
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated.as_deref().and_then(parse_date)
    }

    /// Matches on native or English city name / 城市匹配（原名或英文名）
    pub fn in_city(&self, city: &str) -> bool {
        self.city == city || self.city_en.as_deref() == Some(city)
    }

    pub fn has_status(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status) || self.status_en.as_deref() == Some(status)
    }

    pub fn has_type(&self, plan_type: &str) -> bool {
        self.plan_type.as_deref() == Some(plan_type) || self.type_en.as_deref() == Some(plan_type)
    }

    pub fn has_documents(&self) -> bool {
        self.documents.as_ref().map(PlanDocuments::has_required).unwrap_or(false)
    }
}

/// Repository-level metadata / 仓库元信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryInfo {
    #[serde(deserialize_with = "lenient_u64")]
    pub total_plans: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_status: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-city aggregate from the side-index / 城市聚合信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityAggregate {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_string")]
    pub city_en: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    pub count: u64,
    #[serde(deserialize_with = "lenient_strings")]
    pub characteristics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_building_height: Option<Value>,
    #[serde(deserialize_with = "lenient_strings")]
    pub plans: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Precomputed grouping by city/status/type / 预计算分组
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptimization {
    #[serde(deserialize_with = "lenient_map")]
    pub by_city: BTreeMap<String, CityAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_type: Option<Value>,
}

/// The complete static dataset / 主索引
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterIndex {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_info: Option<RepositoryInfo>,
    /// plan number -> record, ordered by plan number / 计划编号 -> 记录
    #[serde(deserialize_with = "lenient_map")]
    pub quick_access: BTreeMap<String, PlanRecord>,
    pub search_optimization: SearchOptimization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<Value>,
}

impl MasterIndex {
    pub fn plan(&self, plan_number: &str) -> Option<&PlanRecord> {
        self.quick_access.get(plan_number)
    }

    pub fn plans(&self) -> impl Iterator<Item = &PlanRecord> {
        self.quick_access.values()
    }

    /// Reported total, falling back to the loaded record count / 计划总数
    pub fn total_plans(&self) -> u64 {
        self.repository_info
            .as_ref()
            .map(|info| info.total_plans)
            .filter(|total| *total > 0)
            .unwrap_or(self.quick_access.len() as u64)
    }

    /// Plan numbers referenced by `by_city` but absent from `quick_access` / 悬空引用
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let quick_access = &self.quick_access;
        self.search_optimization
            .by_city
            .iter()
            .flat_map(move |(city, agg)| {
                agg.plans
                    .iter()
                    .filter(move |n| !quick_access.contains_key(n.as_str()))
                    .map(move |n| (city.clone(), n.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plan_type_falls_back_to_mahut() {
        let plan: PlanRecord = serde_json::from_value(json!({
            "plan_number": "1",
            "city": "חיפה",
            "mahut": "תוכנית מתאר"
        }))
        .unwrap();
        assert_eq!(plan.plan_type(), Some("תוכנית מתאר"));

        let plan: PlanRecord = serde_json::from_value(json!({
            "plan_number": "2", "type": "", "mahut": "איחוד וחלוקה"
        }))
        .unwrap();
        assert_eq!(plan.plan_type(), Some("איחוד וחלוקה"));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let value = json!({
            "plan_number": "552-0137539",
            "city": "אור יהודה",
            "type": "תוכנית מפורטת",
            "keywords": ["מגורים"],
            "processing_complete": true,
            "area_dunam": 12.5
        });
        let plan: PlanRecord = serde_json::from_value(value).unwrap();
        assert_eq!(plan.extra.get("area_dunam"), Some(&json!(12.5)));

        let out = serde_json::to_value(&plan).unwrap();
        assert_eq!(out["type"], "תוכנית מפורטת");
        assert_eq!(out["area_dunam"], 12.5);
    }

    #[test]
    fn test_null_fields_default() {
        let plan: PlanRecord = serde_json::from_value(json!({
            "plan_number": "7", "city": null, "keywords": null, "processing_complete": null
        }))
        .unwrap();
        assert_eq!(plan.city, "");
        assert!(plan.keywords.is_empty());
        assert!(!plan.processing_complete);
    }

    #[test]
    fn test_has_documents() {
        let plan: PlanRecord = serde_json::from_value(json!({
            "documents": {"takanon": null, "tasritim": [], "other": true}
        }))
        .unwrap();
        assert!(plan.has_documents());

        let plan: PlanRecord = serde_json::from_value(json!({
            "documents": {"takanon": null, "other": true}
        }))
        .unwrap();
        assert!(!plan.has_documents());

        assert!(!PlanRecord::default().has_documents());
    }

    #[test]
    fn test_date_hint_prefers_status_date() {
        let plan: PlanRecord = serde_json::from_value(json!({
            "status_date": "01/02/2020", "last_updated": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(plan.date_hint(), Some("01/02/2020"));

        let plan: PlanRecord = serde_json::from_value(json!({
            "status_date": "", "last_updated": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(plan.date_hint(), Some("2024-01-01"));
    }

    #[test]
    fn test_dangling_references() {
        let index: MasterIndex = serde_json::from_value(json!({
            "quick_access": {"1": {"plan_number": "1", "city": "X"}},
            "search_optimization": {"by_city": {"X": {"count": 2, "plans": ["1", "9"]}}}
        }))
        .unwrap();
        assert_eq!(index.dangling_references(), vec![("X".to_string(), "9".to_string())]);
        assert_eq!(index.total_plans(), 1);
    }
}
