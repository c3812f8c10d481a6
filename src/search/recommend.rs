//! Recommendation engine / 推荐引擎
//!
//! Candidates share the city, the type or at least one keyword with the
//! target. Score is 3 for same city plus 2 for same type; keyword overlap
//! only grants membership.

use super::engine::PlanSearch;
use super::schema::Recommendation;
use crate::models::PlanRecord;

/// Maximum recommendations per plan / 最大推荐数
pub const MAX_RECOMMENDATIONS: usize = 5;

const CITY_SCORE: u32 = 3;
const TYPE_SCORE: u32 = 2;

fn same_city(a: &PlanRecord, b: &PlanRecord) -> bool {
    !a.city.is_empty() && a.city == b.city
}

fn same_type(a: &PlanRecord, b: &PlanRecord) -> bool {
    matches!((a.plan_type(), b.plan_type()), (Some(x), Some(y)) if x == y)
}

fn shares_keyword(a: &PlanRecord, b: &PlanRecord) -> bool {
    a.keywords.iter().any(|k| b.keywords.contains(k))
}

impl PlanSearch {
    /// Up to 5 related plans, best score first; empty for an unknown plan / 相关计划推荐
    pub fn recommendations(&self, plan_number: &str) -> Vec<Recommendation<'_>> {
        let Some(target) = self.plan(plan_number) else {
            return Vec::new();
        };

        let mut candidates: Vec<Recommendation<'_>> = self
            .index()
            .plans()
            .filter(|p| p.plan_number != plan_number)
            .filter(|p| same_city(p, target) || same_type(p, target) || shares_keyword(p, target))
            .map(|plan| {
                let mut score = 0;
                if same_city(plan, target) {
                    score += CITY_SCORE;
                }
                if same_type(plan, target) {
                    score += TYPE_SCORE;
                }
                Recommendation { plan, score }
            })
            .collect();

        // stable: equal scores keep index order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(MAX_RECOMMENDATIONS);
        candidates
    }
}
