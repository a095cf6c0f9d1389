use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use hotcoffee_inventory::InventoryItem;

// -------------------------
// Request DTOs
// -------------------------

/// `POST /inventory` body: a single item or a list of items.
#[derive(Debug)]
pub enum CreateItemsRequest {
    Many(Vec<InventoryItem>),
    One(InventoryItem),
}

// Branch on the JSON shape; field errors (e.g. missing `quantity`) surface as-is.
impl<'de> Deserialize<'de> for CreateItemsRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_array() {
            serde_json::from_value(value)
                .map(CreateItemsRequest::Many)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(CreateItemsRequest::One)
                .map_err(D::Error::custom)
        }
    }
}

impl CreateItemsRequest {
    pub fn into_items(self) -> Vec<InventoryItem> {
        match self {
            CreateItemsRequest::Many(items) => items,
            CreateItemsRequest::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateItemsQuery {
    /// Insert the whole body in one transaction instead of item by item.
    #[serde(default)]
    pub atomic: bool,
}

/// `PUT /inventory/{id}` body. Only `quantity` is mutable; other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: f64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn inventory_to_json(item: &InventoryItem) -> serde_json::Value {
    serde_json::json!({
        "ingredient_id": item.ingredient_id.as_str(),
        "name": item.name,
        "quantity": item.quantity,
        "unit": item.unit,
    })
}

pub fn inventory_list_to_json(items: &[InventoryItem]) -> serde_json::Value {
    serde_json::Value::Array(items.iter().map(inventory_to_json).collect())
}
