//! Recipe (menu item) records

use serde::{Deserialize, Serialize};

/// Every recipe has exactly this many ingredient slots
pub const SLOT_COUNT: usize = 4;

/// One ingredient slot exactly as loaded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlot {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Recipe row exactly as it appeared in the source table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecipe {
    pub menu_item: Option<String>,
    pub slots: [RawSlot; SLOT_COUNT],
}

/// Normalized ingredient reference
///
/// An absent cell and a whitespace-only cell are different defects and are
/// reported differently, so they stay distinct here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientName {
    /// Cell was empty / missing-value token
    Absent,
    /// Cell held only whitespace
    Blank,
    /// Lower-cased, trimmed name
    Named(String),
}

impl IngredientName {
    /// Lookup key into the item table, if there is one
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Absent | Self::Blank => None,
        }
    }

    /// Text used in recipe-side findings (empty when there is no name)
    pub fn as_str(&self) -> &str {
        self.key().unwrap_or("")
    }
}

/// Normalized slot quantity
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// No quantity given; nothing to check
    Absent,
    /// Parsed after removing thousands separators
    Numeric(f64),
    /// Not a number; keeps the original text for the report
    Invalid(String),
}

/// One normalized ingredient slot
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientSlot {
    /// 1-based slot position
    pub position: usize,
    pub name: IngredientName,
    pub quantity: Quantity,
    /// Lower-cased, trimmed unit; blank units are `None`
    pub unit: Option<String>,
}

/// Normalized recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Menu item name, verbatim
    pub menu_item: Option<String>,
    /// Slot `i` holds position `i + 1`
    pub slots: [IngredientSlot; SLOT_COUNT],
}

impl Recipe {
    /// Menu item name for findings
    pub fn name(&self) -> Option<String> {
        self.menu_item.clone()
    }
}

impl From<&IngredientSlot> for RawSlot {
    fn from(slot: &IngredientSlot) -> Self {
        let name = match &slot.name {
            IngredientName::Absent => None,
            IngredientName::Blank => Some(String::new()),
            IngredientName::Named(name) => Some(name.clone()),
        };
        let quantity = match &slot.quantity {
            Quantity::Absent => None,
            Quantity::Numeric(value) => Some(value.to_string()),
            Quantity::Invalid(raw) => Some(raw.clone()),
        };

        Self {
            name,
            quantity,
            unit: slot.unit.clone(),
        }
    }
}

impl From<&Recipe> for RawRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            menu_item: recipe.menu_item.clone(),
            slots: recipe.slots.each_ref().map(RawSlot::from),
        }
    }
}
