//! Export search results to JSON, CSV or Markdown / 导出搜索结果

use thiserror::Error;

use super::schema::PlanSummary;

const CSV_HEADERS: [&str; 5] = ["Plan Number", "City", "Type", "Status", "Last Updated"];

/// Export format / 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl From<&str> for ExportFormat {
    /// Unknown formats fall back to JSON / 未知格式按JSON处理
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "csv" => ExportFormat::Csv,
            "md" | "markdown" => ExportFormat::Markdown,
            _ => ExportFormat::Json,
        }
    }
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn file_name(&self) -> String {
        format!("search-results.{}", self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize results in the requested format / 按格式导出
pub fn export_results(results: &[PlanSummary], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        ExportFormat::Csv => export_csv(results),
        ExportFormat::Markdown => Ok(export_markdown(results)),
    }
}

/// Line breaks inside a value become spaces, one record per line / 字段内换行替换为空格
fn csv_field(value: Option<&str>) -> String {
    value.unwrap_or("").replace(|c: char| c == '\r' || c == '\n', " ")
}

/// Header plus one `\n`-terminated row per result / 表头加每条结果一行
pub fn export_csv(results: &[PlanSummary]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for r in results {
        writer.write_record([
            csv_field(Some(&r.plan_number)),
            csv_field(Some(&r.city)),
            csv_field(r.plan_type.as_deref()),
            csv_field(r.status.as_deref()),
            csv_field(r.last_updated.as_deref()),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn export_markdown(results: &[PlanSummary]) -> String {
    let mut md = String::from("# Search Results\n\n");

    for r in results {
        md.push_str(&format!("## {} - {}\n", r.plan_number, r.city));
        md.push_str(&format!("- **Type:** {}\n", r.plan_type.as_deref().unwrap_or("")));
        md.push_str(&format!("- **Status:** {}\n", r.status.as_deref().unwrap_or("")));
        md.push_str(&format!("- **Summary:** {}\n", r.summary));
        if !r.keywords.is_empty() {
            md.push_str(&format!("- **Keywords:** {}\n", r.keywords.join(", ")));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(plan_number: &str, city: &str, keywords: &[&str]) -> PlanSummary {
        PlanSummary {
            plan_number: plan_number.to_string(),
            city: city.to_string(),
            city_en: None,
            status: Some("מאושר".to_string()),
            plan_type: Some("תוכנית מפורטת".to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            summary: format!("תוכנית מפורטת ב{} - מאושר", city),
            details_path: None,
            last_updated: Some("2024-01-01".to_string()),
            processing_complete: true,
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ExportFormat::from("CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from("md"), ExportFormat::Markdown);
        assert_eq!(ExportFormat::from("markdown"), ExportFormat::Markdown);
        assert_eq!(ExportFormat::from("xml"), ExportFormat::Json);
        assert_eq!(ExportFormat::from("xml").file_name(), "search-results.json");
    }

    #[test]
    fn test_csv_has_header_plus_one_line_per_result() {
        for n in [0usize, 1, 4] {
            let results: Vec<PlanSummary> = (0..n).map(|i| summary(&i.to_string(), "חיפה", &[])).collect();
            let csv = export_csv(&results).unwrap();
            assert_eq!(csv.lines().count(), n + 1);
            assert!(csv.starts_with("Plan Number,City,Type,Status,Last Updated\n"));
        }
    }

    #[test]
    fn test_csv_quotes_commas_and_quotes() {
        let mut quoted = summary("2", "חיפה", &[]);
        quoted.status = Some("say \"hi\"".to_string());
        let csv = export_csv(&[summary("1", "Tel Aviv, Yafo", &[]), quoted]).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows[0], "1,\"Tel Aviv, Yafo\",תוכנית מפורטת,מאושר,2024-01-01");
        assert_eq!(rows[1], "2,חיפה,תוכנית מפורטת,\"say \"\"hi\"\"\",2024-01-01");
    }

    #[test]
    fn test_csv_line_breaks_stay_on_one_row() {
        let mut broken = summary("1", "חיפה", &[]);
        broken.status = Some("a\nb".to_string());
        broken.plan_type = Some("x\r\ny".to_string());
        let csv = export_csv(&[broken]).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert_eq!(csv.lines().nth(1), Some("1,חיפה,x  y,a b,2024-01-01"));

        let value = export_results(&[summary("1", "לוד", &[])], ExportFormat::Csv).unwrap();
        assert!(value.ends_with("2024-01-01\n"));
    }

    #[test]
    fn test_markdown() {
        let md = export_markdown(&[summary("1", "חיפה", &["park", "road"]), summary("2", "לוד", &[])]);
        assert!(md.starts_with("# Search Results\n\n## 1 - חיפה\n- **Type:** תוכנית מפורטת\n"));
        assert!(md.contains("- **Keywords:** park, road\n"));
        assert_eq!(md.matches("**Keywords:**").count(), 1);
        assert_eq!(md.matches("## ").count(), 2);
    }

    #[test]
    fn test_json_is_pretty_array() {
        let json = export_results(&[summary("1", "חיפה", &[])], ExportFormat::Json).unwrap();
        assert!(json.starts_with("[\n"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["planNumber"], "1");
    }
}
