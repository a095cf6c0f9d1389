use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use hotcoffee_inventory::{IngredientId, InventoryItem};

/// A single mutation inside a transactional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert a new row; fails with `StoreError::Duplicate` if the identifier is taken.
    Insert(InventoryItem),
    /// Set `quantity` (and `updated_at`) on the matching row.
    UpdateQuantity {
        ingredient_id: IngredientId,
        quantity: f64,
    },
    /// Physically delete the matching row.
    Delete(IngredientId),
}

/// Inventory store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation).
/// The service maps them onto its own error kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The uniqueness constraint on `ingredient_id` rejected an insert.
    #[error("inventory item already exists: {0}")]
    Duplicate(IngredientId),

    /// An update or delete matched no row.
    #[error("no inventory row matched: {0}")]
    NoMatch(IngredientId),

    /// Connection, query, decode or transaction failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Repository over the `inventory` table.
///
/// Every mutation goes through [`InventoryStore::apply`], which runs a batch of
/// [`WriteOp`]s as one all-or-nothing transaction. The convenience writers below
/// are thin wrappers over it, so single-row and bulk writes share the same
/// commit/rollback path.
///
/// Implementations must:
/// - reject duplicate identifiers (uniqueness constraint)
/// - report `NoMatch` when an update/delete touches zero rows
/// - leave storage unchanged when any op in a batch fails
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Execute `ops` in order inside one transaction.
    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    /// Full current collection. Callers must not rely on ordering.
    async fn get_all(&self) -> Result<Vec<InventoryItem>, StoreError>;

    /// Keyed lookup.
    async fn find(&self, ingredient_id: &IngredientId) -> Result<Option<InventoryItem>, StoreError>;

    /// Whether a row with the same identifier as `item` already exists.
    async fn exists(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        Ok(self.find(&item.ingredient_id).await?.is_some())
    }

    /// Bulk insert, all-or-nothing.
    async fn save_all(&self, items: Vec<InventoryItem>) -> Result<(), StoreError> {
        self.apply(items.into_iter().map(WriteOp::Insert).collect()).await
    }

    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::Insert(item)]).await
    }

    /// Overwrite the quantity of the row matching `item.ingredient_id`.
    async fn update_quantity(&self, item: &InventoryItem) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::UpdateQuantity {
            ingredient_id: item.ingredient_id.clone(),
            quantity: item.quantity,
        }])
        .await
    }

    async fn delete(&self, ingredient_id: &IngredientId) -> Result<(), StoreError> {
        self.apply(vec![WriteOp::Delete(ingredient_id.clone())]).await
    }
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        (**self).apply(ops).await
    }

    async fn get_all(&self) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).get_all().await
    }

    async fn find(&self, ingredient_id: &IngredientId) -> Result<Option<InventoryItem>, StoreError> {
        (**self).find(ingredient_id).await
    }

    async fn exists(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        (**self).exists(item).await
    }

    async fn save_all(&self, items: Vec<InventoryItem>) -> Result<(), StoreError> {
        (**self).save_all(items).await
    }

    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError> {
        (**self).insert(item).await
    }

    async fn update_quantity(&self, item: &InventoryItem) -> Result<(), StoreError> {
        (**self).update_quantity(item).await
    }

    async fn delete(&self, ingredient_id: &IngredientId) -> Result<(), StoreError> {
        (**self).delete(ingredient_id).await
    }
}
