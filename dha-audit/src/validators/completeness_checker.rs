//! Completeness Checker
//!
//! Collects item rows missing a required field and, independently, rows
//! whose tax rate is absent or could not be parsed. The two lists may share
//! rows.

use super::Validator;
use crate::models::{Item, MissingData, NormalizedTables};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessChecker;

impl CompletenessChecker {
    pub fn new() -> Self {
        Self
    }

    /// Rows missing supplier code, size, unit or price (each row once)
    pub fn missing_fields(&self, items: &[Item]) -> Vec<Item> {
        items.iter().filter(|item| item.is_incomplete()).cloned().collect()
    }

    pub fn invalid_tax_rates(&self, items: &[Item]) -> Vec<Item> {
        items
            .iter()
            .filter(|item| item.tax_rate.is_none())
            .cloned()
            .collect()
    }
}

impl Validator for CompletenessChecker {
    type Output = MissingData;

    fn name(&self) -> &'static str {
        "CompletenessChecker"
    }

    fn validate(&self, tables: &NormalizedTables) -> Self::Output {
        let missing = MissingData {
            missing_fields: self.missing_fields(&tables.items),
            invalid_tax_rates: self.invalid_tax_rates(&tables.items),
        };

        debug!(
            validator = self.name(),
            missing_fields = missing.missing_fields.len(),
            invalid_tax_rates = missing.invalid_tax_rates.len(),
            "Completeness check complete"
        );

        missing
    }
}
