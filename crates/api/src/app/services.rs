use std::sync::Arc;

use sqlx::PgPool;

use hotcoffee_infra::{InMemoryInventoryStore, InventoryService, InventoryStore, PostgresInventoryStore};

/// Store handle shared by every request (Postgres in production, in-memory for dev/tests).
pub type SharedInventoryStore = Arc<dyn InventoryStore>;

/// Services injected into the router.
pub struct AppServices {
    inventory: InventoryService<SharedInventoryStore>,
}

impl AppServices {
    pub fn new(store: SharedInventoryStore) -> Self {
        Self {
            inventory: InventoryService::new(store),
        }
    }

    pub fn inventory(&self) -> &InventoryService<SharedInventoryStore> {
        &self.inventory
    }
}

/// In-memory wiring (dev/test): nothing survives a restart.
pub fn build_in_memory_services() -> AppServices {
    tracing::warn!("using in-memory inventory store; data is not persisted");
    AppServices::new(Arc::new(InMemoryInventoryStore::new()))
}

/// Postgres wiring over an already-verified pool.
pub fn build_persistent_services(pool: PgPool) -> AppServices {
    AppServices::new(Arc::new(PostgresInventoryStore::new(pool)))
}
