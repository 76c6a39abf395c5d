//! Inventory item records

use serde::{Deserialize, Serialize};

/// Item row exactly as it appeared in the source table
///
/// `None` means the cell was empty or held a missing-value token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub size: Option<String>,
    pub price: Option<String>,
    pub tax_rate: Option<String>,
    pub supplier_code: Option<String>,
}

/// Normalized inventory item
///
/// Name and unit are lower-cased and trimmed; numeric fields that could not
/// be parsed are `None` and surface later as completeness findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Join key used by recipe ingredients
    pub name: Option<String>,
    /// Unit of measure
    pub unit: Option<String>,
    /// Pack size
    pub size: Option<f64>,
    /// Price per unit excluding VAT
    pub price: Option<f64>,
    /// Tax rate as a plain percentage number (20.0 for "20 %")
    pub tax_rate: Option<f64>,
    /// Supplier code, kept verbatim
    pub supplier_code: Option<String>,
}

impl Item {
    /// True when any of supplier code, size, unit or price is absent
    pub fn is_incomplete(&self) -> bool {
        self.supplier_code.is_none()
            || self.size.is_none()
            || self.unit.is_none()
            || self.price.is_none()
    }
}

impl From<&Item> for RawItem {
    /// Render a normalized item back into raw cells
    ///
    /// Numbers use the shortest round-trip representation, so normalizing
    /// the result yields the same item again.
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            unit: item.unit.clone(),
            size: item.size.map(|v| v.to_string()),
            price: item.price.map(|v| v.to_string()),
            tax_rate: item.tax_rate.map(|v| v.to_string()),
            supplier_code: item.supplier_code.clone(),
        }
    }
}
