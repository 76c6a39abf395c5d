//! Recipe Resolver
//!
//! Checks that every ingredient slot names a known item. Empty slots are
//! findings too: an absent cell is tagged `[NaN]`, a cell that trims to
//! nothing is tagged `[empty string]`. Units and quantities are not
//! consulted here.

use super::Validator;
use crate::models::{
    IngredientName, Item, MissingIngredient, NormalizedTables, Recipe, EMPTY_TAG, NAN_TAG,
};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeResolver;

impl RecipeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Normalized names of every item row
    pub fn known_items(items: &[Item]) -> HashSet<&str> {
        items.iter().filter_map(|item| item.name.as_deref()).collect()
    }

    /// Unresolved slots in recipe order, then slot order
    pub fn resolve(&self, recipes: &[Recipe], known: &HashSet<&str>) -> Vec<MissingIngredient> {
        let mut missing = Vec::new();

        for recipe in recipes {
            for slot in &recipe.slots {
                let value = match &slot.name {
                    IngredientName::Absent => NAN_TAG.to_string(),
                    IngredientName::Blank => EMPTY_TAG.to_string(),
                    IngredientName::Named(name) if known.contains(name.as_str()) => continue,
                    IngredientName::Named(name) => name.clone(),
                };

                missing.push(MissingIngredient {
                    recipe: recipe.name(),
                    missing_ingredient: value,
                    position: slot.position,
                });
            }
        }

        missing
    }
}

impl Validator for RecipeResolver {
    type Output = Vec<MissingIngredient>;

    fn name(&self) -> &'static str {
        "RecipeResolver"
    }

    fn validate(&self, tables: &NormalizedTables) -> Self::Output {
        let known = Self::known_items(&tables.items);
        let missing = self.resolve(&tables.recipes, &known);

        debug!(
            validator = self.name(),
            known_items = known.len(),
            unresolved = missing.len(),
            "Recipe resolution complete"
        );

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientSlot, Quantity, SLOT_COUNT};

    fn recipe(menu_item: Option<&str>, names: [IngredientName; SLOT_COUNT]) -> Recipe {
        let mut position = 0;
        Recipe {
            menu_item: menu_item.map(str::to_string),
            slots: names.map(|name| {
                position += 1;
                IngredientSlot {
                    position,
                    name,
                    quantity: Quantity::Absent,
                    unit: None,
                }
            }),
        }
    }

    fn named(name: &str) -> IngredientName {
        IngredientName::Named(name.to_string())
    }

    fn item(name: &str) -> Item {
        Item {
            name: Some(name.to_string()),
            ..Item::default()
        }
    }

    #[test]
    fn test_every_unresolved_slot_is_reported_with_position() {
        let tables = NormalizedTables {
            items: vec![item("flour"), item("milk")],
            recipes: vec![recipe(
                Some("Pancakes"),
                [
                    named("flour"),
                    IngredientName::Absent,
                    IngredientName::Blank,
                    named("eggs"),
                ],
            )],
        };

        let missing = RecipeResolver::new().validate(&tables);
        let found: Vec<(&str, usize)> = missing
            .iter()
            .map(|m| (m.missing_ingredient.as_str(), m.position))
            .collect();
        assert_eq!(found, vec![("[NaN]", 2), ("[empty string]", 3), ("eggs", 4)]);
        assert!(missing.iter().all(|m| m.recipe.as_deref() == Some("Pancakes")));
    }

    #[test]
    fn test_line_rendering() {
        let tables = NormalizedTables {
            items: vec![item("salt")],
            recipes: vec![
                recipe(
                    Some("Soup"),
                    [named("salt"), named("leek"), named("salt"), named("salt")],
                ),
                recipe(
                    None,
                    [IngredientName::Absent, named("salt"), named("salt"), named("salt")],
                ),
            ],
        };

        let lines: Vec<String> = RecipeResolver::new()
            .validate(&tables)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "Soup: Missing leek (Position Ingredient 2)".to_string(),
                "[NaN]: Missing [NaN] (Position Ingredient 1)".to_string(),
            ]
        );
    }

    #[test]
    fn test_known_items_match_after_normalization_only() {
        let items = [item("olive oil"), Item::default()];
        let known = RecipeResolver::known_items(&items);
        assert_eq!(known.len(), 1);
        assert!(known.contains("olive oil"));
    }

    #[test]
    fn test_no_recipes_no_findings() {
        let tables = NormalizedTables {
            items: vec![item("flour")],
            recipes: vec![],
        };
        assert!(RecipeResolver::new().validate(&tables).is_empty());
    }
}
