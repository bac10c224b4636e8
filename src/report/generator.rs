//! Report generation.
//!
//! Renders weekly statistics as JSON (year → weekly rows) or as a Markdown
//! table per year.

use crate::analysis::{group_by_year, totals};
use crate::cli::OutputFormat;
use crate::models::{ReportMetadata, WeekStat};
use anyhow::Result;

/// Printed when there is nothing to report.
pub const NO_RESULT: &str = "No result found";

/// Render stats in the requested format.
///
/// Absent and empty stats both render as [`NO_RESULT`].
pub fn render(
    stats: Option<&[WeekStat]>,
    metadata: &ReportMetadata,
    format: OutputFormat,
) -> Result<String> {
    match stats {
        Some(stats) if !stats.is_empty() => match format {
            OutputFormat::Json => generate_json_report(stats),
            OutputFormat::Markdown => Ok(generate_markdown_report(stats, metadata)),
        },
        _ => Ok(format!("{}\n", NO_RESULT)),
    }
}

/// Generate a JSON object mapping each year to its weekly rows.
pub fn generate_json_report(stats: &[WeekStat]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&group_by_year(stats))?;
    json.push('\n');
    Ok(json)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(stats: &[WeekStat], metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# JobPulse Report\n\n");
    output.push_str(&generate_metadata_section(metadata));

    for (year, rows) in group_by_year(stats) {
        output.push_str(&generate_year_section(year, &rows));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Feed:** {}\n", metadata.feed_url));
    section.push_str(&format!(
        "- **Modified Since:** {}\n",
        metadata.modified_since.format("%Y-%m-%d")
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Pages Fetched:** {}\n", metadata.pages_fetched));
    section.push_str(&format!(
        "- **Matching Postings:** {}\n",
        metadata.matching_items
    ));
    section.push('\n');

    section
}

/// Generate the table for one year.
fn generate_year_section(year: i32, rows: &[WeekStat]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", year));
    section.push_str("| Week | Kotlin | Java |\n");
    section.push_str("|:---:|:---:|:---:|\n");

    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.week, row.kotlin_count, row.java_count
        ));
    }

    let (kotlin, java) = totals(rows);
    section.push_str(&format!("| **Total** | **{}** | **{}** |\n\n", kotlin, java));

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by JobPulse*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stat(year: i32, week: u32, kotlin_count: usize, java_count: usize) -> WeekStat {
        WeekStat {
            year,
            week,
            kotlin_count,
            java_count,
        }
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            feed_url: "https://example.com/api/v1/feed".to_string(),
            modified_since: Utc.with_ymd_and_hms(2024, 7, 21, 0, 0, 0).unwrap(),
            generated_at: Utc.with_ymd_and_hms(2025, 1, 19, 12, 0, 0).unwrap(),
            pages_fetched: 3,
            matching_items: 4,
        }
    }

    #[test]
    fn test_json_groups_by_year() {
        let stats = vec![stat(2024, 52, 0, 1), stat(2025, 1, 1, 1), stat(2025, 2, 1, 0)];

        let json = generate_json_report(&stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["2024"].as_array().unwrap().len(), 1);
        assert_eq!(value["2025"].as_array().unwrap().len(), 2);
        assert_eq!(value["2025"][0]["week"], 1);
        assert_eq!(value["2025"][0]["kotlin_count"], 1);
        assert_eq!(value["2025"][0]["java_count"], 1);
        assert!(json.find("\"2024\"").unwrap() < json.find("\"2025\"").unwrap());
    }

    #[test]
    fn test_markdown_report() {
        let stats = vec![stat(2024, 52, 0, 1), stat(2025, 1, 2, 1)];

        let markdown = generate_markdown_report(&stats, &metadata());

        assert!(markdown.contains("# JobPulse Report"));
        assert!(markdown.contains("- **Modified Since:** 2024-07-21"));
        assert!(markdown.contains("- **Pages Fetched:** 3"));
        assert!(markdown.contains("## 2024"));
        assert!(markdown.contains("## 2025"));
        assert!(markdown.contains("| 52 | 0 | 1 |"));
        assert!(markdown.contains("| **Total** | **2** | **1** |"));
    }

    #[test]
    fn test_render_no_result() {
        let meta = metadata();
        for format in [OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(render(None, &meta, format).unwrap(), "No result found\n");
            assert_eq!(render(Some(&[][..]), &meta, format).unwrap(), "No result found\n");
        }
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let stats = vec![stat(2025, 2, 1, 1)];
        let meta = metadata();

        let json = render(Some(stats.as_slice()), &meta, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));

        let markdown = render(Some(stats.as_slice()), &meta, OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# JobPulse Report"));
    }
}
