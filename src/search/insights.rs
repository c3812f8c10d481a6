//! Repository analytics / 统计分析

use std::collections::BTreeMap;

use super::engine::{sort_by_freshness, PlanSearch};
use super::schema::Insights;
use crate::models::PlanRecord;
use crate::utils::parse_year;

/// Sentinel bucket for missing values / 未知值分组
pub const UNKNOWN: &str = "לא ידוע";

const RECENT_PLANS: usize = 10;

fn bump(distribution: &mut BTreeMap<String, usize>, key: &str) {
    *distribution.entry(key.to_string()).or_insert(0) += 1;
}

impl PlanSearch {
    /// Distributions and recent plans, optionally scoped to one city / 统计信息
    pub fn insights(&self, city: Option<&str>) -> Insights<'_> {
        let mut plans: Vec<&PlanRecord> = match city.filter(|c| !c.is_empty()) {
            Some(city) => self.city_plans(city).collect(),
            None => self.index().plans().collect(),
        };

        let mut status_distribution = BTreeMap::new();
        let mut type_distribution = BTreeMap::new();
        let mut year_distribution = BTreeMap::new();

        for plan in &plans {
            bump(
                &mut status_distribution,
                plan.status.as_deref().filter(|s| !s.is_empty()).unwrap_or(UNKNOWN),
            );
            bump(&mut type_distribution, plan.plan_type().unwrap_or(UNKNOWN));

            let year = plan.date_hint().and_then(parse_year);
            match year {
                Some(year) => bump(&mut year_distribution, &year.to_string()),
                None => bump(&mut year_distribution, UNKNOWN),
            }
        }

        let total_plans = plans.len();
        let completed = plans.iter().filter(|p| p.processing_complete).count();
        let processing_rate = (total_plans > 0).then(|| completed as f64 / total_plans as f64);

        sort_by_freshness(&mut plans, false);
        plans.truncate(RECENT_PLANS);

        Insights {
            total_plans,
            processing_rate,
            status_distribution,
            type_distribution,
            year_distribution,
            recent_plans: plans,
        }
    }
}
