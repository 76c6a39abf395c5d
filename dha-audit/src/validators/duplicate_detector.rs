//! Fuzzy Duplicate Detector
//!
//! Finds item names that are probably the same product entered twice
//! ("flour" / "flours", "olive oil" / "oil olive").
//!
//! # Algorithm
//! 1. Collect distinct normalized names in first-appearance order
//!    (absent and empty names are skipped).
//! 2. For each name not yet claimed by a cluster, score it against every
//!    name with `token_sort_ratio` and keep scores ≥ threshold, best first
//!    (ties keep scan order).
//! 3. Drop the name itself and anything already claimed.
//! 4. If matches remain, emit a cluster and claim the name and its matches.
//!
//! Clustering is first-seen greedy, not a transitive closure: whether two
//! names that are both close to a third end up together depends on scan
//! order. Report consumers rely on this behavior, keep it.

use super::Validator;
use crate::models::{DuplicateCluster, Item, NormalizedTables};
use crate::similarity::token_sort_ratio;
use dha_common::AuditRules;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Greedy near-duplicate name clustering
#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    /// Minimum similarity (0-100) to count as a match
    threshold: f64,
    /// Best-N candidate cap applied before excluding self/claimed names
    max_candidates: Option<usize>,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new(90.0)
    }
}

impl DuplicateDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            max_candidates: None,
        }
    }

    pub fn from_rules(rules: &AuditRules) -> Self {
        Self {
            threshold: rules.duplicate_threshold,
            max_candidates: rules.max_candidates,
        }
    }

    pub fn with_max_candidates(mut self, limit: usize) -> Self {
        self.max_candidates = Some(limit);
        self
    }

    /// Distinct non-empty item names in first-appearance order
    pub fn unique_names(items: &[Item]) -> Vec<&str> {
        let mut seen = HashSet::new();
        items
            .iter()
            .filter_map(|item| item.name.as_deref())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Cluster `names` (already distinct, in scan order)
    pub fn find_clusters(&self, names: &[&str]) -> Vec<DuplicateCluster> {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut clusters = Vec::new();

        for &name in names {
            if claimed.contains(name) {
                continue;
            }

            let mut candidates: Vec<(&str, f64)> = names
                .iter()
                .map(|&other| (other, token_sort_ratio(name, other)))
                .filter(|(_, score)| *score >= self.threshold)
                .collect();

            // Stable: equal scores keep scan order
            candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
            if let Some(limit) = self.max_candidates {
                candidates.truncate(limit);
            }

            let matches: Vec<(&str, f64)> = candidates
                .into_iter()
                .filter(|(other, _)| *other != name && !claimed.contains(other))
                .collect();

            if matches.is_empty() {
                continue;
            }

            claimed.insert(name);
            claimed.extend(matches.iter().map(|(other, _)| *other));

            clusters.push(DuplicateCluster {
                original: name.to_string(),
                matches: matches.iter().map(|(other, _)| other.to_string()).collect(),
                confidence: matches.iter().map(|(_, score)| *score).collect(),
            });
        }

        clusters
    }
}

impl Validator for DuplicateDetector {
    type Output = Vec<DuplicateCluster>;

    fn name(&self) -> &'static str {
        "DuplicateDetector"
    }

    fn validate(&self, tables: &NormalizedTables) -> Self::Output {
        let names = Self::unique_names(&tables.items);
        let clusters = self.find_clusters(&names);

        debug!(
            validator = self.name(),
            names = names.len(),
            clusters = clusters.len(),
            threshold = self.threshold,
            "Duplicate detection complete"
        );

        clusters
    }
}
