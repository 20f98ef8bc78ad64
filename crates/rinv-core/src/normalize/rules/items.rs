//! Line item normalization.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::invoice::LineItem;
use crate::models::row::{is_truthy, value_amount, value_text};

/// Description for items that carry none.
pub const EMPTY_DESCRIPTION: &str = "—";

/// Description of the placeholder item used when a row has no item list.
pub const PLACEHOLDER_DESCRIPTION: &str = "Items[0].Description";

/// Converts a raw item list into canonical line items.
///
/// A missing (or `null`) list becomes a single labeled placeholder item so an
/// empty template still shows where items go. A list that is present but is
/// not a sequence yields no items.
#[derive(Debug, Clone)]
pub struct ItemNormalizer {
    empty_description: String,
    placeholder_description: String,
}

impl ItemNormalizer {
    pub fn new() -> Self {
        Self {
            empty_description: EMPTY_DESCRIPTION.to_string(),
            placeholder_description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }

    /// Set the description used for items without one.
    pub fn with_empty_description(mut self, description: impl Into<String>) -> Self {
        self.empty_description = description.into();
        self
    }

    /// Set the description of the placeholder item.
    pub fn with_placeholder_description(mut self, description: impl Into<String>) -> Self {
        self.placeholder_description = description.into();
        self
    }

    /// Normalize a raw `Items` value.
    pub fn normalize(&self, raw: Option<&Value>) -> Vec<LineItem> {
        match raw.filter(|v| !v.is_null()) {
            None => vec![self.placeholder()],
            Some(Value::Array(entries)) => entries.iter().map(|e| self.normalize_item(e)).collect(),
            Some(_) => Vec::new(),
        }
    }

    /// The labeled stand-in for a missing item list.
    pub fn placeholder(&self) -> LineItem {
        LineItem {
            description: self.placeholder_description.clone(),
            quantity: None,
            price: None,
            total: Decimal::ZERO,
        }
    }

    /// Normalize one entry. Non-mapping entries are treated as empty mappings.
    pub fn normalize_item(&self, entry: &Value) -> LineItem {
        let empty = Map::new();
        let fields = entry.as_object().unwrap_or(&empty);
        let get = |key: &str| fields.get(key).filter(|v| !v.is_null());

        let description = get("Description")
            .filter(|v| is_truthy(v))
            .and_then(value_text)
            .unwrap_or_else(|| self.empty_description.clone());
        let price = get("Price").and_then(value_amount).unwrap_or(Decimal::ZERO);
        let quantity = get("Quantity").and_then(value_amount).unwrap_or(Decimal::ONE);

        let total = match get("Total") {
            Some(total) => value_amount(total).unwrap_or(Decimal::ZERO),
            None if !price.is_zero() => price.saturating_mul(quantity),
            None => Decimal::ZERO,
        };

        LineItem {
            description,
            quantity: Some(quantity),
            price: Some(price),
            total,
        }
    }
}

impl Default for ItemNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw `Items` value with default settings.
pub fn normalize_items(raw: Option<&Value>) -> Vec<LineItem> {
    ItemNormalizer::new().normalize(raw)
}
