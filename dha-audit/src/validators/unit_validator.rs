//! Unit & Quantity Validator
//!
//! Three checks:
//! - **Item units**: items whose unit is not in the allowed set (an absent
//!   unit is not allowed either) are reported as full rows.
//! - **Recipe slots**: a present, disallowed unit is a unit issue; a
//!   non-numeric quantity is a quantity issue; a numeric quantity above the
//!   ceiling for its unit is a ceiling violation.
//! - **Unit consistency**: a slot whose ingredient resolves to a known item
//!   and carries a unit must use the item's registered unit. Unresolved
//!   ingredients are skipped here; the recipe resolver reports them.

use super::Validator;
use crate::models::{
    Item, NormalizedTables, Quantity, QuantityIssue, Recipe, RecipeIssue, RecipeIssueKind,
    UnitFindings, UnitMismatch,
};
use dha_common::AuditRules;
use std::collections::HashMap;
use tracing::debug;

/// Unit and quantity rules over both tables
#[derive(Debug, Clone)]
pub struct UnitValidator {
    rules: AuditRules,
}

impl Default for UnitValidator {
    fn default() -> Self {
        Self::new(AuditRules::default())
    }
}

impl UnitValidator {
    pub fn new(rules: AuditRules) -> Self {
        Self { rules }
    }

    /// Items whose unit is absent or not allowed
    pub fn check_item_units(&self, items: &[Item]) -> Vec<Item> {
        items
            .iter()
            .filter(|item| {
                item.unit
                    .as_deref()
                    .map_or(true, |unit| !self.rules.is_allowed(unit))
            })
            .cloned()
            .collect()
    }

    /// Normalized item name → registered unit; later rows win
    pub fn item_unit_map(items: &[Item]) -> HashMap<&str, Option<&str>> {
        let mut map = HashMap::with_capacity(items.len());
        for item in items {
            if let Some(name) = item.name.as_deref() {
                map.insert(name, item.unit.as_deref());
            }
        }
        map
    }

    /// Walk every recipe slot once, filling all three recipe-side lists
    fn check_recipes(
        &self,
        recipes: &[Recipe],
        item_units: &HashMap<&str, Option<&str>>,
        findings: &mut UnitFindings,
    ) {
        for recipe in recipes {
            for slot in &recipe.slots {
                let ingredient = slot.name.as_str();
                let unit = slot.unit.as_deref();

                if let Some(unit) = unit {
                    if !self.rules.is_allowed(unit) {
                        findings.unit_issues.recipes.push(RecipeIssue {
                            recipe: recipe.name(),
                            ingredient: ingredient.to_string(),
                            issue: format!("Invalid unit \"{}\"", unit),
                            kind: RecipeIssueKind::Unit,
                        });
                    }
                }

                match &slot.quantity {
                    Quantity::Absent => {}
                    Quantity::Invalid(raw) => {
                        findings.unit_issues.recipes.push(RecipeIssue {
                            recipe: recipe.name(),
                            ingredient: ingredient.to_string(),
                            issue: format!("Non-numeric quantity \"{}\"", raw),
                            kind: RecipeIssueKind::Quantity,
                        });
                    }
                    Quantity::Numeric(quantity) => {
                        let ceiling = unit.and_then(|u| self.rules.ceiling(u).map(|c| (u, c)));
                        if let Some((unit, limit)) = ceiling {
                            if *quantity > limit {
                                findings.quantity_issues.push(QuantityIssue {
                                    recipe: recipe.name(),
                                    ingredient: ingredient.to_string(),
                                    quantity: *quantity,
                                    unit: unit.to_string(),
                                    limit,
                                });
                            }
                        }
                    }
                }

                if let (Some(key), Some(unit)) = (slot.name.key(), unit) {
                    if let Some(item_unit) = item_units.get(key) {
                        if *item_unit != Some(unit) {
                            findings.unit_consistency.push(UnitMismatch {
                                recipe: recipe.name(),
                                ingredient: key.to_string(),
                                recipe_unit: unit.to_string(),
                                item_unit: item_unit.map(str::to_string),
                            });
                        }
                    }
                }
            }
        }
    }
}

impl Validator for UnitValidator {
    type Output = UnitFindings;

    fn name(&self) -> &'static str {
        "UnitValidator"
    }

    fn validate(&self, tables: &NormalizedTables) -> Self::Output {
        let mut findings = UnitFindings::default();
        findings.unit_issues.items = self.check_item_units(&tables.items);

        let item_units = Self::item_unit_map(&tables.items);
        self.check_recipes(&tables.recipes, &item_units, &mut findings);

        debug!(
            validator = self.name(),
            item_unit_issues = findings.unit_issues.items.len(),
            recipe_issues = findings.unit_issues.recipes.len(),
            quantity_issues = findings.quantity_issues.len(),
            unit_mismatches = findings.unit_consistency.len(),
            "Unit validation complete"
        );

        findings
    }
}
