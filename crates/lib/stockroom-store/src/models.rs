use serde::{Deserialize, Serialize};

/// A stocked product record.
///
/// `quantity` stays within `0..=max_stock` after every committed batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    /// Price in minor currency units.
    pub price: i64,
    pub quantity: i64,
    pub max_stock: i64,
}

impl Item {
    /// Remaining room before the item reaches `max_stock`.
    #[must_use]
    pub const fn headroom(&self) -> i64 {
        self.max_stock.saturating_sub(self.quantity)
    }
}

/// One `(item id, quantity delta)` pair inside a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub id: i64,
    pub quantity: i64,
}

impl LineItem {
    #[must_use]
    pub const fn new(id: i64, quantity: i64) -> Self {
        Self { id, quantity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_uses_snake_case_wire_fields() {
        let item = Item {
            id: 1,
            name: "manzanas".to_string(),
            price: 150,
            quantity: 20,
            max_stock: 100,
        };
        let value = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(value["max_stock"], 100);
        assert_eq!(item.headroom(), 80);
    }

    #[test]
    fn line_item_parses_from_batch_body() {
        let lines: Vec<LineItem> = serde_json::from_str(r#"[{"id":1,"quantity":5},{"id":3,"quantity":2}]"#)
            .expect("batch should parse");
        assert_eq!(lines, vec![LineItem::new(1, 5), LineItem::new(3, 2)]);
    }
}
