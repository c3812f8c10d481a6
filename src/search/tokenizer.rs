//! Query tokenizer / 查询分词器
//!
//! Whitespace split + lowercase. Matching is plain substring containment,
//! no stemming or fuzzy matching.

use crate::models::PlanRecord;

/// Tokenize search query / 对搜索查询进行分词
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Case-insensitive containment / 不区分大小写的包含判断
pub fn contains_term(text: &str, term: &str) -> bool {
    !text.is_empty() && text.to_lowercase().contains(term)
}

/// A plan matches when any term is found in its keywords, city names,
/// plan number or description / 任一词命中即匹配
pub fn matches_any_term(plan: &PlanRecord, terms: &[String]) -> bool {
    terms.iter().any(|term| {
        plan.keywords.iter().any(|keyword| contains_term(keyword, term))
            || contains_term(&plan.city, term)
            || plan.city_en.as_deref().map(|c| contains_term(c, term)).unwrap_or(false)
            || contains_term(&plan.plan_number, term)
            || contains_term(plan.description(), term)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> PlanRecord {
        PlanRecord {
            plan_number: "552-0137539".to_string(),
            city: "אור יהודה".to_string(),
            city_en: Some("Or Yehuda".to_string()),
            mahut: Some("תוכנית מפורטת".to_string()),
            keywords: vec!["Residential".to_string(), "מגורים".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_tokenize_query() {
        assert_eq!(tokenize_query("  Or   YEHUDA\tpark "), vec!["or", "yehuda", "park"]);
        assert!(tokenize_query("   ").is_empty());
    }

    #[test]
    fn test_matches_any_field() {
        let p = plan();
        assert!(matches_any_term(&p, &tokenize_query("residential")));
        assert!(matches_any_term(&p, &tokenize_query("yehuda")));
        assert!(matches_any_term(&p, &tokenize_query("יהודה")));
        assert!(matches_any_term(&p, &tokenize_query("0137")));
        assert!(matches_any_term(&p, &tokenize_query("מפורטת")));
    }

    #[test]
    fn test_terms_are_ored() {
        let p = plan();
        assert!(matches_any_term(&p, &tokenize_query("nothing-here yehuda")));
        assert!(!matches_any_term(&p, &tokenize_query("haifa industrial")));
    }
}
