//! The canonical, display-ready invoice.
//!
//! Field names serialize in the host's PascalCase so the view layer can bind
//! to the same names it uses for raw rows (`Invoicer.Name`, `Items`, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::row::{decimal_to_value, value_amount, value_text};

/// A single display cell: a number, a piece of text, or nothing.
///
/// Money fields are usually numbers, but placeholder mode labels empty slots
/// with their own field name (`"Taxes"`), so they share this type with the
/// header fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Decimal),
    Text(String),
    #[default]
    Empty,
}

impl Scalar {
    /// Build a cell from a raw field, keeping strings as text.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value {
            Some(number @ Value::Number(_)) => value_amount(number)
                .map(Scalar::Number)
                .or_else(|| value_text(number).map(Scalar::Text))
                .unwrap_or_default(),
            Some(other) => value_text(other).map(Scalar::Text).unwrap_or_default(),
            None => Scalar::Empty,
        }
    }

    /// Build a money cell; numeric strings become numbers.
    pub fn amount_from_field(value: Option<&Value>) -> Self {
        match value.and_then(value_amount) {
            Some(amount) => Scalar::Number(amount),
            None => Self::from_field(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Empty => true,
            Scalar::Text(s) => s.is_empty(),
            Scalar::Number(_) => false,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Empty => Ok(()),
        }
    }
}

impl From<Decimal> for Scalar {
    fn from(value: Decimal) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A complete invoice, ready for the view layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invoice {
    /// Invoice number or label.
    pub number: Scalar,

    /// Issue date (unix seconds or date text).
    pub issued: Scalar,

    /// Payment due date.
    pub due: Scalar,

    /// Free-form note shown under the totals.
    pub note: Scalar,

    pub subtotal: Scalar,

    pub taxes: Scalar,

    pub deduction: Scalar,

    pub total: Scalar,

    /// Line items in source order.
    pub items: Vec<LineItem>,

    /// The party issuing the invoice.
    pub invoicer: Party,

    /// The party being billed.
    pub client: Party,
}

/// A party (invoicer or client) on the invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party {
    pub name: String,

    pub street1: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,

    pub city: String,

    pub state: String,

    pub zip: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Link target derived from `website` when the host gave none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Party {
    /// Address as display lines, skipping empty parts.
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.street1.is_empty() {
            lines.push(self.street1.clone());
        }
        if let Some(street2) = self.street2.as_deref().filter(|s| !s.is_empty()) {
            lines.push(street2.to_string());
        }

        let region = [self.state.as_str(), self.zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let locality = match (self.city.is_empty(), region.is_empty()) {
            (false, false) => format!("{}, {}", self.city, region),
            (false, true) => self.city.clone(),
            (true, _) => region,
        };
        if !locality.is_empty() {
            lines.push(locality);
        }
        lines
    }
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    /// Never empty; missing descriptions get a dash.
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Line total; zero when it cannot be resolved.
    pub total: Decimal,
}

impl LineItem {
    /// Encode back into the host's raw row shape.
    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("Description".into(), Value::String(self.description.clone()));
        if let Some(quantity) = self.quantity {
            fields.insert("Quantity".into(), decimal_to_value(quantity));
        }
        if let Some(price) = self.price {
            fields.insert("Price".into(), decimal_to_value(price));
        }
        fields.insert("Total".into(), decimal_to_value(self.total));
        Value::Object(fields)
    }
}
