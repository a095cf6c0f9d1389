//! Inventory application service.
//!
//! Sits between the HTTP layer and an [`InventoryStore`]: validates input,
//! enforces existence/uniqueness rules, and maps store failures onto error
//! kinds a caller can turn into a status code.
//!
//! ```text
//! request
//!   ↓
//! 1. Validate (domain rules, no IO)
//!   ↓
//! 2. Existence check through the store
//!   ↓
//! 3. Mutation through the store (transactional)
//! ```
//!
//! The pre-checks give friendly errors; the store's own constraints stay
//! authoritative, so a racing request still ends up as `Conflict`/`NotFound`
//! rather than a storage failure.

use thiserror::Error;

use hotcoffee_core::DomainError;
use hotcoffee_inventory::{IngredientId, InventoryItem, validate_quantity};

use crate::inventory_store::{InventoryStore, StoreError};

const ALREADY_EXISTS: &str = "item already exists";
const NOT_FOUND: &str = "inventory item not found";

#[derive(Debug, Error)]
pub enum InventoryServiceError {
    /// Bad input shape or value.
    #[error("{0}")]
    Validation(String),
    /// The identifier is already taken.
    #[error("{0}")]
    Conflict(String),
    /// The identifier is unknown.
    #[error("{0}")]
    NotFound(String),
    /// Storage failed. `context` is safe to show to callers; `source` is not.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl InventoryServiceError {
    fn storage(context: &'static str, source: StoreError) -> Self {
        Self::Storage { context, source }
    }
}

impl From<DomainError> for InventoryServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(_) | DomainError::InvalidId(_) => {
                InventoryServiceError::Validation(value.to_string())
            }
        }
    }
}

impl From<StoreError> for InventoryServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(_) => InventoryServiceError::Conflict(ALREADY_EXISTS.to_string()),
            StoreError::NoMatch(_) => InventoryServiceError::NotFound(NOT_FOUND.to_string()),
            other => InventoryServiceError::storage("storage operation failed", other),
        }
    }
}

/// Inventory business rules over an injected store.
#[derive(Debug)]
pub struct InventoryService<S> {
    store: S,
}

impl<S> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> InventoryService<S>
where
    S: InventoryStore,
{
    /// Add items one by one, stopping at the first failure.
    ///
    /// Items processed before the failing one stay committed. Returns the
    /// items that were inserted.
    pub async fn add_inventory_items(
        &self,
        items: Vec<InventoryItem>,
    ) -> Result<Vec<InventoryItem>, InventoryServiceError> {
        let mut added = Vec::with_capacity(items.len());

        for item in items {
            item.validate()?;

            let exists = self
                .store
                .exists(&item)
                .await
                .map_err(|e| InventoryServiceError::storage("failed to check existence", e))?;
            if exists {
                tracing::debug!(ingredient_id = %item.ingredient_id, "rejecting duplicate inventory item");
                return Err(InventoryServiceError::Conflict(ALREADY_EXISTS.to_string()));
            }

            self.store.insert(item.clone()).await.map_err(|e| match e {
                StoreError::Duplicate(_) => InventoryServiceError::from(e),
                other => InventoryServiceError::storage("failed to insert inventory item", other),
            })?;

            tracing::info!(ingredient_id = %item.ingredient_id, "inventory item added");
            added.push(item);
        }

        Ok(added)
    }

    /// Validate every item, then insert them in one all-or-nothing batch.
    pub async fn save_inventory_batch(
        &self,
        items: Vec<InventoryItem>,
    ) -> Result<Vec<InventoryItem>, InventoryServiceError> {
        for item in &items {
            item.validate()?;
        }

        self.store.save_all(items.clone()).await.map_err(|e| match e {
            StoreError::Duplicate(_) => InventoryServiceError::from(e),
            other => InventoryServiceError::storage("failed to save inventory items", other),
        })?;

        tracing::info!(count = items.len(), "inventory batch saved");
        Ok(items)
    }

    /// Remove one item by identifier.
    pub async fn delete_inventory_item(&self, id: &IngredientId) -> Result<(), InventoryServiceError> {
        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(ingredient_id = %id, "inventory item deleted");
                Ok(())
            }
            Err(StoreError::NoMatch(_)) => Err(InventoryServiceError::NotFound(NOT_FOUND.to_string())),
            Err(other) => Err(InventoryServiceError::storage("failed to delete inventory item", other)),
        }
    }

    /// Full collection. The storage cause is logged, not returned in the message.
    pub async fn get_inventory_items(&self) -> Result<Vec<InventoryItem>, InventoryServiceError> {
        self.store.get_all().await.map_err(|e| {
            tracing::error!(error = %e, "failed to load inventory");
            InventoryServiceError::storage("failed to get inventory items", e)
        })
    }

    pub async fn get_inventory_item_by_id(
        &self,
        id: &IngredientId,
    ) -> Result<InventoryItem, InventoryServiceError> {
        self.store
            .find(id)
            .await
            .map_err(|e| InventoryServiceError::storage("failed to get inventory item", e))?
            .ok_or_else(|| InventoryServiceError::NotFound(NOT_FOUND.to_string()))
    }

    /// Replace the quantity of an existing item; other fields are left untouched.
    pub async fn update_inventory_item(
        &self,
        id: &IngredientId,
        quantity: f64,
    ) -> Result<InventoryItem, InventoryServiceError> {
        validate_quantity(quantity)?;

        let current = self.get_inventory_item_by_id(id).await?;
        let updated = current.with_quantity(quantity);

        // The row can vanish between the lookup and the update; NoMatch covers that.
        self.store.update_quantity(&updated).await.map_err(|e| match e {
            StoreError::NoMatch(_) => InventoryServiceError::from(e),
            other => InventoryServiceError::storage("failed to update inventory item", other),
        })?;

        tracing::info!(ingredient_id = %id, quantity, "inventory quantity updated");
        Ok(updated)
    }
}
