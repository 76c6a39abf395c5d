//! End-to-end audit tests over CSV tables on disk

use dha_audit::loader::{ITEMS_FILE, RECIPES_FILE};
use dha_audit::models::RecipeIssueKind;
use dha_audit::{output, HealthAuditor};
use dha_common::{AuditRules, Error};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ITEMS_HEADER: &str =
    "Item name,Item Unit of Measure,Item size,€ Price per unit (excluding VAT),Tax rate,Supplier code";

fn recipes_header() -> String {
    dha_audit::loader::recipe_columns().join(",")
}

fn fixture_folder() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample")
}

fn write_tables(items: &str, recipes: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(ITEMS_FILE), items).unwrap();
    fs::write(dir.path().join(RECIPES_FILE), recipes).unwrap();
    dir
}

fn auditor() -> HealthAuditor {
    HealthAuditor::new(AuditRules::default()).unwrap()
}

#[test]
fn test_sample_folder_summary() {
    let report = auditor().audit_folder(&fixture_folder()).unwrap();
    let summary = report.summary();

    assert_eq!(summary.duplicate_items, 2);
    assert_eq!(summary.invalid_units, 3);
    assert_eq!(summary.excessive_quantities, 1);
    assert_eq!(summary.missing_ingredients, 4);
    assert_eq!(summary.missing_data_entries, 2);
    assert_eq!(summary.unit_consistency_issues, 4);
}

#[test]
fn test_sample_folder_details() {
    let report = auditor().audit_folder(&fixture_folder()).unwrap();

    let originals: Vec<&str> = report.duplicates.iter().map(|c| c.original.as_str()).collect();
    assert_eq!(originals, vec!["flour", "olive oil"]);
    assert_eq!(report.duplicates[1].matches, vec!["oil olive".to_string()]);

    assert_eq!(report.unit_issues.items[0].name.as_deref(), Some("butter"));
    let kinds: Vec<RecipeIssueKind> = report.unit_issues.recipes.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![RecipeIssueKind::Unit, RecipeIssueKind::Quantity]);

    let excess = &report.quantity_issues[0];
    assert_eq!(excess.recipe.as_deref(), Some("Bread"));
    assert_eq!(excess.quantity, 51.0);
    assert_eq!(excess.limit, 50.0);

    assert_eq!(report.missing_data.missing_fields[0].name.as_deref(), Some("sugar"));
    assert_eq!(report.missing_data.invalid_tax_rates[0].name.as_deref(), Some("butter"));

    let lines: Vec<String> = report.recipe_issues.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Latte: Missing [NaN] (Position Ingredient 3)",
            "Latte: Missing [NaN] (Position Ingredient 4)",
            "Bread: Missing salt (Position Ingredient 3)",
            "Pancakes: Missing [empty string] (Position Ingredient 3)",
        ]
    );

    let mismatched: Vec<(&str, &str)> = report
        .unit_consistency
        .iter()
        .map(|m| (m.ingredient.as_str(), m.recipe_unit.as_str()))
        .collect();
    assert_eq!(
        mismatched,
        vec![("sugar", "g"), ("butter", "g"), ("flour", "g"), ("whole milk", "ml")]
    );
}

#[test]
fn test_milk_case_insensitive_match() {
    let dir = write_tables(
        &format!("{}\nmilk,l,1,1.00,7%,S1\n", ITEMS_HEADER),
        &format!("{}\nCocoa,Milk,5,L\n", recipes_header()),
    );

    let report = auditor().audit_folder(dir.path()).unwrap();
    assert!(report.unit_consistency.is_empty());
    assert!(report.quantity_issues.is_empty());
}

#[test]
fn test_missing_files_reported_together() {
    let dir = tempfile::tempdir().unwrap();
    match auditor().audit_folder(dir.path()) {
        Err(Error::MissingFiles { files, .. }) => assert_eq!(files.len(), 2),
        other => panic!("expected MissingFiles, got {:?}", other),
    }

    fs::write(dir.path().join(ITEMS_FILE), ITEMS_HEADER).unwrap();
    match auditor().audit_folder(dir.path()) {
        Err(Error::MissingFiles { files, .. }) => assert_eq!(files, vec![RECIPES_FILE.to_string()]),
        other => panic!("expected MissingFiles, got {:?}", other),
    }
}

#[test]
fn test_missing_recipe_columns_name_the_table() {
    let dir = write_tables(
        ITEMS_HEADER,
        "Menu item name,Name (Ingredient 1)\nSoup,Leek\n",
    );

    let err = auditor().audit_folder(dir.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("recipes"));
    assert!(message.contains("Qty (Ingredient 1)"));
    assert!(message.contains("Unit (Ingredient 4)"));
}

#[test]
fn test_header_only_tables_are_clean() {
    let dir = write_tables(ITEMS_HEADER, &recipes_header());
    let report = auditor().audit_folder(dir.path()).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_parallel_and_sequential_reports_match() {
    let parallel = auditor().audit_folder(&fixture_folder()).unwrap();
    let sequential = auditor()
        .parallel(false)
        .audit_folder(&fixture_folder())
        .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_exact_threshold_keeps_only_reordered_tokens() {
    let rules = AuditRules {
        duplicate_threshold: 100.0,
        ..AuditRules::default()
    };
    let report = HealthAuditor::new(rules)
        .unwrap()
        .audit_folder(&fixture_folder())
        .unwrap();

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].original, "olive oil");
    assert_eq!(report.duplicates[0].confidence, vec![100.0]);
}

#[test]
fn test_reports_written_for_sample() {
    let report = auditor().audit_folder(&fixture_folder()).unwrap();
    let out = tempfile::tempdir().unwrap();
    let written = output::write_reports(&report, out.path()).unwrap();

    assert_eq!(written.len(), 6);

    let missing = fs::read_to_string(out.path().join(output::MISSING_INGREDIENTS_FILE)).unwrap();
    assert_eq!(missing.lines().count(), 4);

    let mut reader = csv::Reader::from_path(out.path().join(output::UNIT_CONSISTENCY_FILE)).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "Latte");
    assert_eq!(&rows[0][3], "kg");

    let duplicates: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join(output::DUPLICATES_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(duplicates.as_array().unwrap().len(), 2);
}
