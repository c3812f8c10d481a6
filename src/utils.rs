//! Date and JSON helper functions / 日期与JSON工具函数
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use serde_json::Value;

/// Parse a date as written in the index / 解析索引中的日期
/// Accepts RFC 3339, `YYYY-MM-DD[ HH:MM:SS]`, `YYYY-MM-DDTHH:MM:SS` and `DD/MM/YYYY`.
/// Date-only values are midnight UTC / 仅日期时按UTC零点
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    None
}

/// Year of a date string, if parseable / 获取年份
pub fn parse_year(raw: &str) -> Option<i32> {
    parse_date(raw).map(|dt| dt.year())
}

/// JSON truthiness: null, false, 0 and "" are falsy / JSON真值判断
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a JSON scalar; null, arrays and objects have none / 标量转文本
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Flag stored as any JSON value, read by truthiness / 宽松布尔值
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(is_truthy(&Value::deserialize(deserializer)?))
}

/// Counter stored as a number or numeric string; anything else counts as 0 / 宽松计数
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(|f| f as u64)
        .unwrap_or(0))
}

/// String stored as any scalar; null and containers become "" / 宽松字符串
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional string stored as any scalar / 宽松可选字符串
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

/// List of strings; a bare scalar counts as a one-element list / 宽松字符串列表
pub fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::Null => Vec::new(),
        other => scalar_text(&other).filter(|s| !s.is_empty()).into_iter().collect(),
    })
}

/// Keyed entries parsed one by one; malformed entries are logged and dropped / 逐条解析，跳过无效项
pub fn lenient_map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                tracing::warn!("Skipping malformed index entry {}: {}", key, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_time(NaiveTime::MIN).and_utc();
        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("05/03/2024"), Some(expected));
        assert_eq!(parse_date(" 2024-03-05 "), Some(expected));
        assert_eq!(parse_date("2024-03-05T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2024-03-05T02:00:00+02:00"), Some(expected));
        assert!(parse_date("2024-03-05T10:30:00.123").is_some());
        assert!(parse_date("2024-03-05 10:30:00").is_some());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("לא ידוע"), None);
        assert_eq!(parse_date("2024-13-40"), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2019-12-31T23:00:00Z"), Some(2019));
        assert_eq!(parse_year("abc"), None);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("takanon.pdf")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({"path": "a"})));
    }

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_u64")]
        count: u64,
        #[serde(default, deserialize_with = "lenient_string")]
        name: String,
        #[serde(default, deserialize_with = "lenient_strings")]
        tags: Vec<String>,
    }

    #[test]
    fn test_lenient_scalars() {
        let loose: Loose =
            serde_json::from_value(json!({"flag": 1, "count": "12", "name": 4000, "tags": "park"})).unwrap();
        assert!(loose.flag);
        assert_eq!(loose.count, 12);
        assert_eq!(loose.name, "4000");
        assert_eq!(loose.tags, vec!["park"]);

        let loose: Loose =
            serde_json::from_value(json!({"flag": "", "count": "many", "name": null, "tags": ["a", 2, null]}))
                .unwrap();
        assert!(!loose.flag);
        assert_eq!(loose.count, 0);
        assert_eq!(loose.name, "");
        assert_eq!(loose.tags, vec!["a", "2"]);
    }

    #[test]
    fn test_lenient_map_drops_bad_entries() {
        #[derive(Debug, Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "lenient_map")]
            entries: BTreeMap<String, Vec<u32>>,
        }

        let wrapper: Wrapper = serde_json::from_value(json!({"entries": {"a": [1], "b": "x", "c": []}})).unwrap();
        assert_eq!(wrapper.entries.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }
}
