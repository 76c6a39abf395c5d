//! Normalizer
//!
//! Turns raw table cells into canonical, comparable values. Nothing here
//! fails: a value that cannot be parsed becomes "absent" and is reported
//! later by the completeness checker or the unit validator.
//!
//! Rules:
//! - item name / unit: lower-cased, trimmed
//! - item size: plain number
//! - item price: number after removing `,` thousands separators
//! - item tax rate: number after removing `%` and all whitespace
//! - slot name: absent / blank / lower-cased trimmed name
//! - slot quantity: absent / number after removing `,` / invalid (raw text)
//! - slot unit: lower-cased, trimmed, blank treated as absent
//!
//! Normalization is idempotent: feeding normalized records back (via their
//! raw rendering) produces identical records.

use crate::models::{
    IngredientName, IngredientSlot, Item, NormalizedTables, Quantity, RawItem, RawRecipe,
    RawSlot, RawTables, Recipe,
};
use tracing::debug;

/// Stateless table normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize both tables into fresh copies
    pub fn normalize(&self, raw: &RawTables) -> NormalizedTables {
        let tables = NormalizedTables {
            items: raw.items.iter().map(|item| self.normalize_item(item)).collect(),
            recipes: raw
                .recipes
                .iter()
                .map(|recipe| self.normalize_recipe(recipe))
                .collect(),
        };

        debug!(
            items = tables.items.len(),
            recipes = tables.recipes.len(),
            unparsed_sizes = tables.items.iter().filter(|i| i.size.is_none()).count(),
            unparsed_prices = tables.items.iter().filter(|i| i.price.is_none()).count(),
            "Normalized tables"
        );

        tables
    }

    pub fn normalize_item(&self, raw: &RawItem) -> Item {
        Item {
            name: raw.name.as_deref().map(fold),
            unit: raw.unit.as_deref().map(fold),
            size: raw.size.as_deref().and_then(parse_number),
            price: raw.price.as_deref().and_then(parse_price),
            tax_rate: raw.tax_rate.as_deref().and_then(parse_tax_rate),
            supplier_code: raw.supplier_code.clone(),
        }
    }

    pub fn normalize_recipe(&self, raw: &RawRecipe) -> Recipe {
        Recipe {
            menu_item: raw.menu_item.clone(),
            slots: std::array::from_fn(|i| self.normalize_slot(i + 1, &raw.slots[i])),
        }
    }

    fn normalize_slot(&self, position: usize, raw: &RawSlot) -> IngredientSlot {
        let name = match raw.name.as_deref().map(fold) {
            None => IngredientName::Absent,
            Some(name) if name.is_empty() => IngredientName::Blank,
            Some(name) => IngredientName::Named(name),
        };

        let quantity = match raw.quantity.as_deref() {
            None => Quantity::Absent,
            Some(text) => match parse_float(&text.replace(',', "")) {
                Some(value) if value.is_nan() => Quantity::Absent,
                Some(value) => Quantity::Numeric(value),
                None => Quantity::Invalid(text.to_string()),
            },
        };

        let unit = raw
            .unit
            .as_deref()
            .map(fold)
            .filter(|unit| !unit.is_empty());

        IngredientSlot {
            position,
            name,
            quantity,
            unit,
        }
    }
}

/// Case-fold and trim a text cell
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Parse a plain number; NaN and unparsable text are absent
pub fn parse_number(text: &str) -> Option<f64> {
    parse_float(text).filter(|value| !value.is_nan())
}

/// Parse a price, ignoring thousands separators
pub fn parse_price(text: &str) -> Option<f64> {
    parse_number(&text.replace(',', ""))
}

/// Parse a tax rate, ignoring `%` and whitespace anywhere in the cell
pub fn parse_tax_rate(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .collect();
    parse_number(&cleaned)
}

fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}
