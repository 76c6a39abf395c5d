//! Health report records and assembly
//!
//! Every section is an ordered list in table scan order. Field names match
//! the serialized report format.

use super::item::Item;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding value for a slot whose ingredient cell is missing
pub const NAN_TAG: &str = "[NaN]";
/// Finding value for a slot whose ingredient cell is whitespace only
pub const EMPTY_TAG: &str = "[empty string]";

/// Group of item names that are likely duplicates of `original`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub original: String,
    pub matches: Vec<String>,
    /// Similarity score (0-100) of each entry in `matches`
    pub confidence: Vec<f64>,
}

/// Category of a recipe-side unit/quantity issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeIssueKind {
    Unit,
    Quantity,
}

impl fmt::Display for RecipeIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::Quantity => write!(f, "quantity"),
        }
    }
}

/// Disallowed unit or non-numeric quantity in a recipe slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIssue {
    pub recipe: Option<String>,
    pub ingredient: String,
    pub issue: String,
    #[serde(rename = "type")]
    pub kind: RecipeIssueKind,
}

/// Slot quantity above the ceiling for its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityIssue {
    pub recipe: Option<String>,
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
    pub limit: f64,
}

/// Recipe slot unit differs from the unit registered for the item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMismatch {
    pub recipe: Option<String>,
    pub ingredient: String,
    pub recipe_unit: String,
    /// `None` when the item has no unit of measure
    pub item_unit: Option<String>,
}

/// Recipe slot that does not resolve to a known item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingIngredient {
    pub recipe: Option<String>,
    /// `[NaN]`, `[empty string]`, or the unresolved normalized name
    pub missing_ingredient: String,
    /// 1-based slot position
    pub position: usize,
}

impl MissingIngredient {
    /// "Ingredient <i>"
    pub fn position_label(&self) -> String {
        format!("Ingredient {}", self.position)
    }
}

impl fmt::Display for MissingIngredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Missing {} (Position {})",
            self.recipe.as_deref().unwrap_or(NAN_TAG),
            self.missing_ingredient,
            self.position_label()
        )
    }
}

/// Unit problems split by table of origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitIssues {
    /// Items whose unit is not allowed (full normalized rows)
    pub items: Vec<Item>,
    /// Recipe slots with a disallowed unit or a non-numeric quantity
    pub recipes: Vec<RecipeIssue>,
}

/// Completeness findings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingData {
    /// Items missing supplier code, size, unit or price
    pub missing_fields: Vec<Item>,
    /// Items whose tax rate is absent or unparsable
    pub invalid_tax_rates: Vec<Item>,
}

/// Everything the unit & quantity validator produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitFindings {
    pub unit_issues: UnitIssues,
    pub quantity_issues: Vec<QuantityIssue>,
    pub unit_consistency: Vec<UnitMismatch>,
}

/// The aggregate audit result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub duplicates: Vec<DuplicateCluster>,
    pub unit_issues: UnitIssues,
    pub quantity_issues: Vec<QuantityIssue>,
    pub missing_data: MissingData,
    pub recipe_issues: Vec<MissingIngredient>,
    pub unit_consistency: Vec<UnitMismatch>,
}

impl HealthReport {
    /// Merge validator outputs into one report
    ///
    /// Pure aggregation: sections are moved in as-is, any of them may be empty.
    pub fn assemble(
        duplicates: Vec<DuplicateCluster>,
        units: UnitFindings,
        missing_data: MissingData,
        recipe_issues: Vec<MissingIngredient>,
    ) -> Self {
        Self {
            duplicates,
            unit_issues: units.unit_issues,
            quantity_issues: units.quantity_issues,
            missing_data,
            recipe_issues,
            unit_consistency: units.unit_consistency,
        }
    }

    /// Per-category counts
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            duplicate_items: self.duplicates.len(),
            invalid_units: self.unit_issues.items.len() + self.unit_issues.recipes.len(),
            excessive_quantities: self.quantity_issues.len(),
            missing_ingredients: self.recipe_issues.len(),
            missing_data_entries: self.missing_data.missing_fields.len()
                + self.missing_data.invalid_tax_rates.len(),
            unit_consistency_issues: self.unit_consistency.len(),
        }
    }

    pub fn total_findings(&self) -> usize {
        self.summary().total()
    }

    /// True when no section has any finding
    pub fn is_clean(&self) -> bool {
        self.total_findings() == 0
    }
}

/// Finding counts per report category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub duplicate_items: usize,
    pub invalid_units: usize,
    pub excessive_quantities: usize,
    pub missing_ingredients: usize,
    pub missing_data_entries: usize,
    pub unit_consistency_issues: usize,
}

impl ReportSummary {
    /// Sum over all categories
    pub fn total(&self) -> usize {
        self.duplicate_items
            + self.invalid_units
            + self.excessive_quantities
            + self.missing_ingredients
            + self.missing_data_entries
            + self.unit_consistency_issues
    }

    /// (label, count) pairs in console order
    pub fn lines(&self) -> [(&'static str, usize); 6] {
        [
            ("Duplicate items", self.duplicate_items),
            ("Invalid/mismatched units", self.invalid_units),
            ("Excessive quantities", self.excessive_quantities),
            ("Missing ingredients", self.missing_ingredients),
            ("Missing/invalid data entries", self.missing_data_entries),
            ("Unit consistency issues", self.unit_consistency_issues),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_empty_sections() {
        let report = HealthReport::assemble(
            Vec::new(),
            UnitFindings::default(),
            MissingData::default(),
            Vec::new(),
        );
        assert!(report.is_clean());
        assert_eq!(report, HealthReport::default());
    }

    #[test]
    fn test_summary_adds_split_sections() {
        let item = Item::default();
        let report = HealthReport::assemble(
            Vec::new(),
            UnitFindings {
                unit_issues: UnitIssues {
                    items: vec![item.clone()],
                    recipes: vec![RecipeIssue {
                        recipe: Some("Soup".to_string()),
                        ingredient: "salt".to_string(),
                        issue: "Invalid unit \"pinch\"".to_string(),
                        kind: RecipeIssueKind::Unit,
                    }],
                },
                ..UnitFindings::default()
            },
            MissingData {
                missing_fields: vec![item.clone()],
                invalid_tax_rates: vec![item],
            },
            Vec::new(),
        );

        let summary = report.summary();
        assert_eq!(summary.invalid_units, 2);
        assert_eq!(summary.missing_data_entries, 2);
        assert_eq!(summary.total(), 4);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_missing_ingredient_line_format() {
        let finding = MissingIngredient {
            recipe: Some("Omelette".to_string()),
            missing_ingredient: EMPTY_TAG.to_string(),
            position: 2,
        };
        assert_eq!(
            finding.to_string(),
            "Omelette: Missing [empty string] (Position Ingredient 2)"
        );

        let orphan = MissingIngredient {
            recipe: None,
            missing_ingredient: "chives".to_string(),
            position: 4,
        };
        assert_eq!(orphan.to_string(), "[NaN]: Missing chives (Position Ingredient 4)");
    }

    #[test]
    fn test_recipe_issue_serializes_type_field() {
        let issue = RecipeIssue {
            recipe: Some("Soup".to_string()),
            ingredient: "water".to_string(),
            issue: "Non-numeric quantity \"lots\"".to_string(),
            kind: RecipeIssueKind::Quantity,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "quantity");
        assert_eq!(json["recipe"], "Soup");
    }
}
