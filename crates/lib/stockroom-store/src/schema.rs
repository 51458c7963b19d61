use crate::models::Item;

pub const TABLE_ITEM: &str = "item";

/// Idempotent table definition for the item store.
pub const ITEM_SCHEMA: &str = r"
DEFINE TABLE IF NOT EXISTS item SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS name ON item TYPE string;
DEFINE FIELD IF NOT EXISTS price ON item TYPE int;
DEFINE FIELD IF NOT EXISTS quantity ON item TYPE int ASSERT $value >= 0;
DEFINE FIELD IF NOT EXISTS max_stock ON item TYPE int ASSERT $value >= 0;
DEFINE INDEX IF NOT EXISTS item_name ON item FIELDS name UNIQUE;
";

const SEED_CATALOG: [(&str, i64, i64, i64); 8] = [
    ("manzanas", 150, 20, 100),
    ("platanos", 100, 30, 100),
    ("leche", 200, 15, 50),
    ("pan", 120, 25, 60),
    ("huevos", 250, 40, 80),
    ("queso", 300, 10, 40),
    ("jamón", 400, 12, 30),
    ("jugo de naranja", 180, 18, 50),
];

/// Items inserted into an empty store at startup, with ids starting at 1.
#[must_use]
pub fn seed_items() -> Vec<Item> {
    SEED_CATALOG
        .iter()
        .zip(1_i64..)
        .map(|(&(name, price, quantity, max_stock), id)| Item {
            id,
            name: name.to_string(),
            price,
            quantity,
            max_stock,
        })
        .collect()
}
