//! # DHA Common Library
//!
//! Shared code for the data health auditor crates:
//! - Error taxonomy (structural errors only, field defects are report data)
//! - Audit rule set (allowed units, quantity ceilings, duplicate threshold)
//! - TOML configuration loading and folder resolution

pub mod config;
pub mod error;

pub use config::AuditRules;
pub use error::{Error, Result};
