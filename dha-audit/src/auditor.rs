//! Health Auditor
//!
//! Runs one audit: normalize the raw tables once, fan the four validators
//! out over the shared read-only copy, then assemble the report.
//!
//! # Execution
//! Parallel mode (default) runs the validators with nested `rayon::join`;
//! sequential mode runs them one after another. Validators own their output
//! and never touch each other's data, so both modes produce identical
//! reports.

use crate::loader;
use crate::models::{HealthReport, NormalizedTables, RawTables};
use crate::normalizer::Normalizer;
use crate::validators::{
    CompletenessChecker, DuplicateDetector, RecipeResolver, UnitValidator, Validator,
};
use dha_common::{AuditRules, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Audit engine configured with one rule set
#[derive(Debug, Clone)]
pub struct HealthAuditor {
    normalizer: Normalizer,
    duplicates: DuplicateDetector,
    units: UnitValidator,
    completeness: CompletenessChecker,
    resolver: RecipeResolver,
    parallel: bool,
}

impl HealthAuditor {
    /// Build an auditor; the rule set is validated first
    pub fn new(rules: AuditRules) -> Result<Self> {
        let rules = rules.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(),
            duplicates: DuplicateDetector::from_rules(&rules),
            units: UnitValidator::new(rules),
            completeness: CompletenessChecker::new(),
            resolver: RecipeResolver::new(),
            parallel: true,
        })
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load `items.csv` / `recipes.csv` from `folder` and audit them
    pub fn audit_folder(&self, folder: &Path) -> Result<HealthReport> {
        let raw = loader::load_tables(folder)?;
        Ok(self.audit(&raw))
    }

    /// Audit raw tables; the caller's tables are left untouched
    pub fn audit(&self, raw: &RawTables) -> HealthReport {
        let start = Instant::now();
        info!(
            items = raw.items.len(),
            recipes = raw.recipes.len(),
            parallel = self.parallel,
            "Starting audit"
        );

        let tables = self.normalizer.normalize(raw);
        let report = self.audit_normalized(&tables);

        let summary = report.summary();
        info!(
            findings = summary.total(),
            duplicates = summary.duplicate_items,
            invalid_units = summary.invalid_units,
            excessive_quantities = summary.excessive_quantities,
            missing_ingredients = summary.missing_ingredients,
            missing_data = summary.missing_data_entries,
            unit_consistency = summary.unit_consistency_issues,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Audit complete"
        );

        report
    }

    /// Run the validators over already-normalized tables
    pub fn audit_normalized(&self, tables: &NormalizedTables) -> HealthReport {
        let start = Instant::now();

        let (duplicates, units, missing_data, recipe_issues) = if self.parallel {
            let ((duplicates, units), (missing_data, recipe_issues)) = rayon::join(
                || {
                    rayon::join(
                        || self.duplicates.validate(tables),
                        || self.units.validate(tables),
                    )
                },
                || {
                    rayon::join(
                        || self.completeness.validate(tables),
                        || self.resolver.validate(tables),
                    )
                },
            );
            (duplicates, units, missing_data, recipe_issues)
        } else {
            (
                self.duplicates.validate(tables),
                self.units.validate(tables),
                self.completeness.validate(tables),
                self.resolver.validate(tables),
            )
        };

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            parallel = self.parallel,
            "Validators finished"
        );

        HealthReport::assemble(duplicates, units, missing_data, recipe_issues)
    }
}
