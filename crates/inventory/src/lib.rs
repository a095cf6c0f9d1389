//! Inventory domain module.
//!
//! This crate contains the inventory record and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{IngredientId, InventoryItem, validate_quantity};
