//! CSV table loader
//!
//! Reads `items.csv` and `recipes.csv` from a data folder into raw records.
//! Columns are located by header name; extra columns are ignored and short
//! rows leave trailing cells absent. Cells are kept verbatim except that an
//! empty cell or a missing-value token becomes `None`.

use crate::models::{RawItem, RawRecipe, RawSlot, RawTables, SLOT_COUNT};
use dha_common::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const ITEMS_FILE: &str = "items.csv";
pub const RECIPES_FILE: &str = "recipes.csv";

pub const ITEM_NAME: &str = "Item name";
pub const ITEM_UNIT: &str = "Item Unit of Measure";
pub const ITEM_SIZE: &str = "Item size";
pub const ITEM_PRICE: &str = "€ Price per unit (excluding VAT)";
pub const ITEM_TAX_RATE: &str = "Tax rate";
pub const ITEM_SUPPLIER_CODE: &str = "Supplier code";

pub const MENU_ITEM_NAME: &str = "Menu item name";

/// Cell values read as missing, matching common dataframe readers
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-nan", "-NaN", "null", "NULL", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Required item columns in record field order
pub fn item_columns() -> Vec<String> {
    [
        ITEM_NAME,
        ITEM_UNIT,
        ITEM_SIZE,
        ITEM_PRICE,
        ITEM_TAX_RATE,
        ITEM_SUPPLIER_CODE,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// Required recipe columns: menu item, then name/qty/unit per slot
pub fn recipe_columns() -> Vec<String> {
    let mut columns = vec![MENU_ITEM_NAME.to_string()];
    for i in 1..=SLOT_COUNT {
        columns.push(format!("Name (Ingredient {})", i));
        columns.push(format!("Qty (Ingredient {})", i));
        columns.push(format!("Unit (Ingredient {})", i));
    }
    columns
}

pub fn is_na(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

/// Load both tables from `folder`
///
/// Both files are checked before either is read so that every missing file
/// is reported in one error.
pub fn load_tables(folder: &Path) -> Result<RawTables> {
    if folder.exists() && !folder.is_dir() {
        return Err(Error::InvalidInput(format!(
            "data folder {} is not a directory",
            folder.display()
        )));
    }

    let missing: Vec<String> = [ITEMS_FILE, RECIPES_FILE]
        .iter()
        .filter(|name| !folder.join(name).is_file())
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(Error::MissingFiles {
            folder: folder.display().to_string(),
            files: missing,
        });
    }

    let items = read_items(File::open(folder.join(ITEMS_FILE))?)?;
    let recipes = read_recipes(File::open(folder.join(RECIPES_FILE))?)?;

    info!(
        folder = %folder.display(),
        items = items.len(),
        recipes = recipes.len(),
        "Loaded source tables"
    );

    Ok(RawTables { items, recipes })
}

pub fn read_items<R: Read>(reader: R) -> Result<Vec<RawItem>> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let index = locate_columns(&mut csv_reader, "items", &item_columns())?;

    let mut items = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        items.push(RawItem {
            name: cell(&record, index[0]),
            unit: cell(&record, index[1]),
            size: cell(&record, index[2]),
            price: cell(&record, index[3]),
            tax_rate: cell(&record, index[4]),
            supplier_code: cell(&record, index[5]),
        });
    }

    debug!(rows = items.len(), "Read items table");
    Ok(items)
}

pub fn read_recipes<R: Read>(reader: R) -> Result<Vec<RawRecipe>> {
    let mut csv_reader = reader_builder().from_reader(reader);
    let index = locate_columns(&mut csv_reader, "recipes", &recipe_columns())?;

    let mut recipes = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let slot = |i: usize| RawSlot {
            name: cell(&record, index[1 + 3 * i]),
            quantity: cell(&record, index[2 + 3 * i]),
            unit: cell(&record, index[3 + 3 * i]),
        };
        recipes.push(RawRecipe {
            menu_item: cell(&record, index[0]),
            slots: [slot(0), slot(1), slot(2), slot(3)],
        });
    }

    debug!(rows = recipes.len(), "Read recipes table");
    Ok(recipes)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).flexible(true);
    builder
}

/// Header positions of `required`, in the same order
fn locate_columns<R: Read>(
    csv_reader: &mut csv::Reader<R>,
    table: &str,
    required: &[String],
) -> Result<Vec<usize>> {
    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Err(Error::EmptyTable(table.to_string()));
    }

    let mut index = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for column in required {
        match headers.iter().position(|h| h == column) {
            Some(position) => index.push(position),
            None => missing.push(column.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            table: table.to_string(),
            columns: missing,
        });
    }

    Ok(index)
}

fn cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !is_na(value))
        .map(str::to_string)
}
