//! Infrastructure layer: database adapters, inventory persistence, config.

pub mod config;
pub mod db;
pub mod inventory_service;
pub mod inventory_store;

pub use config::{ConfigError, DatabaseConfig};
pub use inventory_service::{InventoryService, InventoryServiceError};
pub use inventory_store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError, WriteOp};
