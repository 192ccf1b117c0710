//! Field-level and cross-field invariants for inventory items.
//!
//! The same rules run on full creation and on merged partial updates, so a
//! patch can never sneak an inconsistent row past validation.

use serde::Deserialize;

use crate::entities::inventory_item;
use crate::errors::ServiceError;

/// Sentinel symbol used when a client omits or blanks out `symbolName`.
pub const DEFAULT_SYMBOL_NAME: &str = "shippingbox";

/// The mutable fields of an inventory item, normalized and ready to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub location: String,
    pub quantity: i32,
    pub max_quantity: i32,
    pub symbol_name: String,
}

impl ItemFields {
    /// Builds fields for item creation: strings trimmed, blank or absent
    /// symbol replaced by the sentinel.
    pub fn new(
        name: &str,
        location: &str,
        quantity: i32,
        max_quantity: i32,
        symbol_name: Option<&str>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            quantity,
            max_quantity,
            symbol_name: normalize_symbol(symbol_name),
        }
    }
}

/// A partial update as sent by `/modify-item`; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub symbol_name: Option<String>,
}

fn normalize_symbol(symbol: Option<&str>) -> String {
    match symbol.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_SYMBOL_NAME.to_string(),
    }
}

/// Overlays `patch` on `existing`: present fields override, absent fields keep
/// the persisted value. Strings are trimmed after the overlay, so a patch that
/// supplies a whitespace-only name is not silently ignored; it becomes an
/// empty name and fails [`validate`].
pub fn merge(existing: &inventory_item::Model, patch: &ItemPatch) -> ItemFields {
    let name = patch.name.as_deref().unwrap_or(&existing.name);
    let location = patch.location.as_deref().unwrap_or(&existing.location);
    let symbol = patch.symbol_name.as_deref().unwrap_or(&existing.symbol_name);

    ItemFields {
        name: name.trim().to_string(),
        location: location.trim().to_string(),
        quantity: patch.quantity.unwrap_or(existing.quantity),
        max_quantity: patch.max_quantity.unwrap_or(existing.max_quantity),
        symbol_name: normalize_symbol(Some(symbol)),
    }
}

/// Checks the item invariants in a fixed order so error messages are
/// deterministic; the first failing rule wins.
pub fn validate(fields: &ItemFields) -> Result<(), ServiceError> {
    if fields.name.is_empty() {
        return Err(ServiceError::ValidationError(
            "name cannot be empty.".to_string(),
        ));
    }
    if fields.location.is_empty() {
        return Err(ServiceError::ValidationError(
            "location cannot be empty.".to_string(),
        ));
    }
    if fields.quantity < 0 {
        return Err(ServiceError::ValidationError(
            "quantity cannot be negative.".to_string(),
        ));
    }
    if fields.max_quantity <= 0 {
        return Err(ServiceError::ValidationError(
            "maxQuantity must be greater than 0.".to_string(),
        ));
    }
    if fields.quantity > fields.max_quantity {
        return Err(ServiceError::ValidationError(
            "quantity cannot be greater than maxQuantity.".to_string(),
        ));
    }
    Ok(())
}
