//! Report writers and console rendering
//!
//! Writes the report sections into an output folder in the file formats
//! downstream spreadsheets and scripts expect, and renders the console
//! summary. Absent recipe names are empty CSV cells.

use crate::models::{HealthReport, ReportSummary};
use chrono::{SecondsFormat, Utc};
use dha_common::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DUPLICATES_FILE: &str = "duplicates_report.json";
pub const UNIT_ISSUES_FILE: &str = "unit_issues.csv";
pub const QUANTITY_ISSUES_FILE: &str = "quantity_issues.csv";
pub const UNIT_CONSISTENCY_FILE: &str = "unit_consistency_issues.csv";
pub const MISSING_INGREDIENTS_FILE: &str = "missing_ingredients.txt";
pub const HEALTH_REPORT_FILE: &str = "health_report.json";

const BANNER_WIDTH: usize = 50;

/// Full report plus run metadata, as written to `health_report.json`
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    /// RFC 3339 UTC timestamp
    pub generated_at: String,
    pub version: &'static str,
    pub summary: ReportSummary,
    #[serde(flatten)]
    pub report: &'a HealthReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(report: &'a HealthReport) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION"),
            summary: report.summary(),
            report,
        }
    }
}

/// Write every report file into `out_dir`, creating it if needed
///
/// Returns the written paths in a fixed order.
pub fn write_reports(report: &HealthReport, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let written = vec![
        write_duplicates(report, &out_dir.join(DUPLICATES_FILE))?,
        write_unit_issues(report, &out_dir.join(UNIT_ISSUES_FILE))?,
        write_quantity_issues(report, &out_dir.join(QUANTITY_ISSUES_FILE))?,
        write_unit_consistency(report, &out_dir.join(UNIT_CONSISTENCY_FILE))?,
        write_missing_ingredients(report, &out_dir.join(MISSING_INGREDIENTS_FILE))?,
        write_health_report(report, &out_dir.join(HEALTH_REPORT_FILE))?,
    ];

    info!(folder = %out_dir.display(), files = written.len(), "Reports written");
    Ok(written)
}

fn write_duplicates(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &report.duplicates)?;
    writer.flush()?;
    debug!(path = %path.display(), rows = report.duplicates.len(), "Wrote duplicates");
    Ok(path.to_path_buf())
}

fn write_unit_issues(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["recipe", "ingredient", "issue", "type"])?;
    for issue in &report.unit_issues.recipes {
        let kind = issue.kind.to_string();
        writer.write_record([
            issue.recipe.as_deref().unwrap_or(""),
            issue.ingredient.as_str(),
            issue.issue.as_str(),
            kind.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_quantity_issues(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["recipe", "ingredient", "quantity", "unit", "limit"])?;
    for issue in &report.quantity_issues {
        let quantity = issue.quantity.to_string();
        let limit = issue.limit.to_string();
        writer.write_record([
            issue.recipe.as_deref().unwrap_or(""),
            issue.ingredient.as_str(),
            quantity.as_str(),
            issue.unit.as_str(),
            limit.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_unit_consistency(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["recipe", "ingredient", "recipe_unit", "item_unit"])?;
    for mismatch in &report.unit_consistency {
        writer.write_record([
            mismatch.recipe.as_deref().unwrap_or(""),
            mismatch.ingredient.as_str(),
            mismatch.recipe_unit.as_str(),
            mismatch.item_unit.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_missing_ingredients(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = BufWriter::new(File::create(path)?);
    for missing in &report.recipe_issues {
        writeln!(writer, "{}", missing)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn write_health_report(report: &HealthReport, path: &Path) -> Result<PathBuf> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &ReportEnvelope::new(report))?;
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Console summary: banner, one count per category, then written files
pub fn render_summary(summary: &ReportSummary, written: &[PathBuf]) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let mut out = format!(
        "\n{}\n{:=^width$}\n{}\n",
        rule,
        " COMPREHENSIVE DATA HEALTH REPORT ",
        rule,
        width = BANNER_WIDTH
    );

    for (label, count) in summary.lines() {
        out.push_str(&format!("{}: {}\n", label, count));
    }

    if !written.is_empty() {
        out.push_str("\nDetailed reports saved to:\n");
        for path in written {
            out.push_str(&format!("- {}\n", path.display()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DuplicateCluster, MissingIngredient, QuantityIssue, RecipeIssue, RecipeIssueKind,
        UnitMismatch,
    };

    fn sample_report() -> HealthReport {
        let mut report = HealthReport::default();
        report.duplicates.push(DuplicateCluster {
            original: "flour".to_string(),
            matches: vec!["flours".to_string()],
            confidence: vec![90.9],
        });
        report.unit_issues.recipes.push(RecipeIssue {
            recipe: Some("Bread".to_string()),
            ingredient: "salt".to_string(),
            issue: "Invalid unit \"pinch\"".to_string(),
            kind: RecipeIssueKind::Unit,
        });
        report.quantity_issues.push(QuantityIssue {
            recipe: Some("Bread".to_string()),
            ingredient: "flour".to_string(),
            quantity: 51.0,
            unit: "kg".to_string(),
            limit: 50.0,
        });
        report.unit_consistency.push(UnitMismatch {
            recipe: None,
            ingredient: "yeast".to_string(),
            recipe_unit: "g".to_string(),
            item_unit: None,
        });
        report.recipe_issues.push(MissingIngredient {
            recipe: None,
            missing_ingredient: "[empty string]".to_string(),
            position: 3,
        });
        report
    }

    #[test]
    fn test_banner_layout() {
        let text = render_summary(&ReportSummary::default(), &[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2].chars().count(), 50);
        assert!(lines[2].starts_with("========"));
        assert!(lines[2].contains(" COMPREHENSIVE DATA HEALTH REPORT "));
        assert_eq!(lines[4], "Duplicate items: 0");
        assert_eq!(lines[9], "Unit consistency issues: 0");
        assert!(!text.contains("Detailed reports"));
    }

    #[test]
    fn test_written_files_listed() {
        let text = render_summary(
            &ReportSummary::default(),
            &[PathBuf::from("out/unit_issues.csv")],
        );
        assert!(text.contains("Detailed reports saved to:\n- out/unit_issues.csv\n"));
    }

    #[test]
    fn test_write_reports_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let written = write_reports(&sample_report(), &out).unwrap();

        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|p| p.is_file()));

        let missing = fs::read_to_string(out.join(MISSING_INGREDIENTS_FILE)).unwrap();
        assert_eq!(missing, "[NaN]: Missing [empty string] (Position Ingredient 3)\n");

        let quantities = fs::read_to_string(out.join(QUANTITY_ISSUES_FILE)).unwrap();
        assert_eq!(
            quantities,
            "recipe,ingredient,quantity,unit,limit\nBread,flour,51,kg,50\n"
        );

        let consistency = fs::read_to_string(out.join(UNIT_CONSISTENCY_FILE)).unwrap();
        assert_eq!(consistency.lines().nth(1), Some(",yeast,g,"));

        let units = fs::read_to_string(out.join(UNIT_ISSUES_FILE)).unwrap();
        assert_eq!(units.lines().nth(1), Some("Bread,salt,\"Invalid unit \"\"pinch\"\"\",unit"));
    }

    #[test]
    fn test_empty_sections_still_get_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_reports(&HealthReport::default(), dir.path()).unwrap();

        let units = fs::read_to_string(dir.path().join(UNIT_ISSUES_FILE)).unwrap();
        assert_eq!(units, "recipe,ingredient,issue,type\n");
        let duplicates = fs::read_to_string(dir.path().join(DUPLICATES_FILE)).unwrap();
        assert_eq!(duplicates, "[]");
    }

    #[test]
    fn test_health_report_envelope() {
        let dir = tempfile::tempdir().unwrap();
        write_reports(&sample_report(), dir.path()).unwrap();

        let text = fs::read_to_string(dir.path().join(HEALTH_REPORT_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["summary"]["duplicate_items"], 1);
        assert_eq!(value["duplicates"][0]["original"], "flour");
        assert_eq!(value["unit_issues"]["recipes"][0]["type"], "unit");
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
    }
}
