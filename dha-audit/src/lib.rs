//! dha-audit library interface
//!
//! Audits an inventory table and a recipe table for data-quality defects
//! and produces a structured health report.
//!
//! Pipeline: raw tables → [`normalizer`] → four independent
//! [`validators`] → [`models::HealthReport`]. The [`loader`] and [`output`]
//! modules are the CSV/JSON adapters around that core; [`auditor`] wires
//! everything together.
//!
//! ```rust,ignore
//! use dha_audit::HealthAuditor;
//! use dha_common::AuditRules;
//!
//! let auditor = HealthAuditor::new(AuditRules::default())?;
//! let report = auditor.audit_folder(Path::new("data"))?;
//! println!("{} findings", report.total_findings());
//! ```

pub mod auditor;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod output;
pub mod similarity;
pub mod validators;

pub use crate::auditor::HealthAuditor;
pub use crate::models::{HealthReport, NormalizedTables, RawTables, ReportSummary};
pub use crate::normalizer::Normalizer;
