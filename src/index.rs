//! Master index loader / 主索引加载器
//!
//! Reads the master index once at startup. No retry, no background refresh:
//! the document is immutable for the process lifetime.

use std::path::Path;
use thiserror::Error;

use crate::models::MasterIndex;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read master index {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse master index {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Load and parse the master index / 加载并解析主索引
pub fn load_master_index(path: &Path) -> Result<MasterIndex, IndexError> {
    let display = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: display.clone(),
        source,
    })?;

    let mut index: MasterIndex =
        serde_json::from_str(&content).map_err(|source| IndexError::Parse { path: display, source })?;

    // Records keyed by plan number may omit the field itself / 补全缺失的计划编号
    for (plan_number, plan) in index.quick_access.iter_mut() {
        if plan.plan_number.is_empty() {
            plan.plan_number = plan_number.clone();
        }
    }

    for (city, plan_number) in index.dangling_references() {
        tracing::warn!("Side-index city {} references unknown plan {}", city, plan_number);
    }

    tracing::info!(
        "Loaded {} plans from master index ({} cities)",
        index.total_plans(),
        index.search_optimization.by_city.len()
    );
    Ok(index)
}

/// Load the master index, substituting an empty one on failure / 加载失败时使用空索引
pub fn load_or_empty(path: &Path) -> MasterIndex {
    match load_master_index(path) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!("Error loading indices, serving an empty index: {}", e);
            MasterIndex::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_master_index() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "repository_info": {{"total_plans": 1, "processing_status": "partial"}},
                "quick_access": {{"101-0001": {{"city": "נתניה", "keywords": ["חוף"]}}}},
                "search_optimization": {{"by_city": {{"נתניה": {{"count": 1, "plans": ["101-0001"]}}}}}}
            }}"#
        )
        .unwrap();

        let index = load_master_index(file.path()).unwrap();
        let plan = index.plan("101-0001").unwrap();
        assert_eq!(plan.plan_number, "101-0001");
        assert_eq!(plan.city, "נתניה");
        assert_eq!(index.total_plans(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_master_index(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn test_invalid_json_degrades_to_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(load_master_index(file.path()), Err(IndexError::Parse { .. })));
        let index = load_or_empty(file.path());
        assert!(index.quick_access.is_empty());
        assert!(index.search_optimization.by_city.is_empty());
    }

    #[test]
    fn test_loosely_typed_values_are_tolerated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "repository_info": {{"total_plans": "2"}},
                "quick_access": {{
                    "1": {{"city": "חיפה", "processing_complete": 1, "keywords": "park"}},
                    "2": {{"city": 7, "status": null, "keywords": null, "processing_complete": "yes"}},
                    "3": "not a record"
                }},
                "search_optimization": {{"by_city": {{
                    "חיפה": {{"count": "1", "plans": ["1"]}},
                    "broken": 5
                }}}}
            }}"#
        )
        .unwrap();

        let index = load_master_index(file.path()).unwrap();
        assert_eq!(index.total_plans(), 2);
        assert_eq!(index.quick_access.keys().collect::<Vec<_>>(), vec!["1", "2"]);

        let first = index.plan("1").unwrap();
        assert!(first.processing_complete);
        assert_eq!(first.keywords, vec!["park"]);

        let second = index.plan("2").unwrap();
        assert_eq!(second.city, "7");
        assert_eq!(second.status, None);
        assert!(second.keywords.is_empty());
        assert!(second.processing_complete);

        assert_eq!(index.search_optimization.by_city.len(), 1);
        assert_eq!(index.search_optimization.by_city["חיפה"].count, 1);
    }
}
