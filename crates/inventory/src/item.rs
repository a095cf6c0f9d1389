use serde::{Deserialize, Serialize};

use hotcoffee_core::{DomainError, DomainResult};

/// Ingredient identifier (externally assigned, e.g. `"espresso-beans"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(String);

impl IngredientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a caller-supplied identifier.
    ///
    /// Blank values and values with leading/trailing whitespace are rejected,
    /// not trimmed. `InventoryItem::validate` applies the same rule.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        check_id(raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_id(raw: &str) -> DomainResult<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_id("ingredient_id cannot be empty"));
    }
    if trimmed.len() != raw.len() {
        return Err(DomainError::invalid_id(
            "ingredient_id cannot have leading or trailing whitespace",
        ));
    }
    Ok(())
}

impl core::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IngredientId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A stocked ingredient.
///
/// Only `quantity` changes after creation; identifier, name and unit are fixed
/// once the record exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default)]
    pub ingredient_id: IngredientId,
    #[serde(default)]
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

impl InventoryItem {
    pub fn new(
        ingredient_id: impl Into<IngredientId>,
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    /// Check the record before it is written.
    pub fn validate(&self) -> DomainResult<()> {
        check_id(self.ingredient_id.as_str())?;
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("unit cannot be empty"));
        }
        validate_quantity(self.quantity)
    }

    /// Same record with a replaced quantity.
    pub fn with_quantity(&self, quantity: f64) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Quantities must be finite and non-negative.
pub fn validate_quantity(quantity: f64) -> DomainResult<()> {
    if !quantity.is_finite() {
        return Err(DomainError::validation("quantity must be a finite number"));
    }
    if quantity < 0.0 {
        return Err(DomainError::validation("quantity cannot be negative"));
    }
    Ok(())
}
