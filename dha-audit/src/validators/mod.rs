//! Validation layer
//!
//! Four independent validators read the shared normalized tables and each
//! produces its own report section. None of them mutates the tables or
//! depends on another validator's output, so they can run in any order or
//! in parallel.
//!
//! # Validators
//! 1. **duplicate_detector** - Fuzzy near-duplicate item names
//! 2. **unit_validator** - Allowed units, quantity ceilings, item/recipe unit consistency
//! 3. **completeness_checker** - Missing required item fields, invalid tax rates
//! 4. **recipe_resolver** - Recipe ingredients that reference no known item

pub mod completeness_checker;
pub mod duplicate_detector;
pub mod recipe_resolver;
pub mod unit_validator;

pub use completeness_checker::CompletenessChecker;
pub use duplicate_detector::DuplicateDetector;
pub use recipe_resolver::RecipeResolver;
pub use unit_validator::UnitValidator;

use crate::models::NormalizedTables;

/// Common interface for the table validators
///
/// Validators never fail: every defect they see is a finding in `Output`.
///
/// # Example
/// ```rust,ignore
/// use dha_audit::validators::{CompletenessChecker, Validator};
///
/// let checker = CompletenessChecker::new();
/// let missing = checker.validate(&tables);
/// println!("{}: {} incomplete items", checker.name(), missing.missing_fields.len());
/// ```
pub trait Validator: Send + Sync {
    /// Report section produced by this validator
    type Output: Send;

    /// Validator name for logging
    fn name(&self) -> &'static str;

    /// Scan the tables and collect findings in table order
    fn validate(&self, tables: &NormalizedTables) -> Self::Output;
}
