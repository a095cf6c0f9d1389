use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use hotcoffee_inventory::{IngredientId, InventoryItem};

use super::r#trait::{InventoryStore, StoreError, WriteOp};

/// In-memory inventory table.
///
/// Intended for tests/dev. Mirrors the Postgres constraints (primary key on
/// `ingredient_id`, `quantity >= 0`) so both stores fail the same way.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    rows: RwLock<BTreeMap<IngredientId, InventoryItem>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table, bypassing the transactional write path.
    pub fn with_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let rows = items
            .into_iter()
            .map(|item| (item.ingredient_id.clone(), item))
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn apply_op(
        rows: &mut BTreeMap<IngredientId, InventoryItem>,
        op: WriteOp,
    ) -> Result<(), StoreError> {
        match op {
            WriteOp::Insert(item) => {
                check_quantity(item.quantity)?;
                if rows.contains_key(&item.ingredient_id) {
                    return Err(StoreError::Duplicate(item.ingredient_id));
                }
                rows.insert(item.ingredient_id.clone(), item);
            }
            WriteOp::UpdateQuantity {
                ingredient_id,
                quantity,
            } => {
                check_quantity(quantity)?;
                match rows.get_mut(&ingredient_id) {
                    Some(row) => row.quantity = quantity,
                    None => return Err(StoreError::NoMatch(ingredient_id)),
                }
            }
            WriteOp::Delete(ingredient_id) => {
                if rows.remove(&ingredient_id).is_none() {
                    return Err(StoreError::NoMatch(ingredient_id));
                }
            }
        }
        Ok(())
    }
}

fn check_quantity(quantity: f64) -> Result<(), StoreError> {
    if quantity >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::Storage(
            "check constraint violated: quantity >= 0".to_string(),
        ))
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn apply(&self, mut ops: Vec<WriteOp>) -> Result<(), StoreError> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        // A single op checks before it mutates, so it can run in place.
        if ops.len() == 1 {
            if let Some(op) = ops.pop() {
                return Self::apply_op(&mut rows, op);
            }
        }

        // Stage against a copy; publish only if every op succeeds.
        let mut staged = rows.clone();
        for op in ops {
            Self::apply_op(&mut staged, op)?;
        }
        *rows = staged;

        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(rows.values().cloned().collect())
    }

    async fn find(&self, ingredient_id: &IngredientId) -> Result<Option<InventoryItem>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(rows.get(ingredient_id).cloned())
    }
}
