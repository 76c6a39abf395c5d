//! Data models for the audit engine
//!
//! Raw records mirror the source tables cell-for-cell (`Option<String>`),
//! normalized records carry typed, comparable values. Report records are
//! the findings produced by the validators.

pub mod item;
pub mod recipe;
pub mod report;

pub use item::{Item, RawItem};
pub use recipe::{
    IngredientName, IngredientSlot, Quantity, RawRecipe, RawSlot, Recipe, SLOT_COUNT,
};
pub use report::{
    DuplicateCluster, HealthReport, MissingData, MissingIngredient, QuantityIssue, RecipeIssue,
    RecipeIssueKind, ReportSummary, UnitFindings, UnitIssues, UnitMismatch, EMPTY_TAG, NAN_TAG,
};

/// Both source tables as loaded, before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTables {
    pub items: Vec<RawItem>,
    pub recipes: Vec<RawRecipe>,
}

/// Both source tables after normalization; read-only during validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTables {
    pub items: Vec<Item>,
    pub recipes: Vec<Recipe>,
}

impl From<&NormalizedTables> for RawTables {
    fn from(tables: &NormalizedTables) -> Self {
        Self {
            items: tables.items.iter().map(RawItem::from).collect(),
            recipes: tables.recipes.iter().map(RawRecipe::from).collect(),
        }
    }
}
