//! Inventory persistence boundary.
//!
//! This module defines the repository abstraction the inventory service writes
//! through, plus an in-memory implementation (tests/dev) and a Postgres one.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{InventoryStore, StoreError, WriteOp};
