//! The normalization pipeline.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ValidationError;
use crate::models::config::NormalizeConfig;
use crate::models::invoice::{Invoice, LineItem, Party, Scalar};
use crate::models::row::{value_text, RawRow};

use super::rules::{
    apply_totals, merge_references, normalize_url_with, url::DEFAULT_SCHEME, ItemNormalizer,
    PlaceholderFiller,
};
use super::{Result, RowNormalizer};

/// Output of a successful normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The canonical invoice.
    pub invoice: Invoice,
    /// The row after merging, item normalization, totals and placeholders.
    pub row: RawRow,
}

/// Turns a raw host row into a canonical invoice.
///
/// Steps, in order: merge `References`, normalize items, synthesize
/// `Subtotal`/`Total`, derive `Invoicer.Url`, fill placeholders, assemble.
/// Only the first step can fail; everything after degrades to defaults.
#[derive(Debug, Clone)]
pub struct InvoiceNormalizer {
    items: ItemNormalizer,
    filler: PlaceholderFiller,
    url_scheme: String,
}

impl InvoiceNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self {
            items: ItemNormalizer::new(),
            filler: PlaceholderFiller::new(),
            url_scheme: DEFAULT_SCHEME.to_string(),
        }
    }

    /// Create a normalizer from configuration.
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            items: ItemNormalizer::new()
                .with_empty_description(&config.empty_description)
                .with_placeholder_description(&config.placeholder_item_description),
            filler: PlaceholderFiller::new()
                .with_note_guidance(&config.note_guidance)
                .with_item_description(&config.placeholder_item_description),
            url_scheme: config.url_scheme.clone(),
        }
    }

    fn derive_invoicer_url(&self, row: &mut RawRow) {
        let Some(invoicer) = row.object_mut("Invoicer") else {
            return;
        };
        if invoicer.get("Url").is_some_and(|url| !url.is_null()) {
            return;
        }
        let website = invoicer
            .get("Website")
            .and_then(value_text)
            .filter(|w| !w.is_empty());
        if let Some(url) = normalize_url_with(website.as_deref(), &self.url_scheme) {
            invoicer.insert("Url".to_string(), Value::String(url));
        }
    }

    fn assemble(&self, row: &RawRow, items: Vec<LineItem>) -> Invoice {
        Invoice {
            number: Scalar::from_field(row.field("Number")),
            issued: Scalar::from_field(row.field("Issued")),
            due: Scalar::from_field(row.field("Due")),
            note: Scalar::from_field(row.field("Note")),
            subtotal: Scalar::amount_from_field(row.field("Subtotal")),
            taxes: Scalar::amount_from_field(row.field("Taxes")),
            deduction: Scalar::amount_from_field(row.field("Deduction")),
            total: Scalar::amount_from_field(row.field("Total")),
            items,
            invoicer: self.party(row.field("Invoicer")),
            client: self.party(row.field("Client")),
        }
    }

    fn party(&self, value: Option<&Value>) -> Party {
        let mut party = match value {
            Some(Value::Object(fields)) => party_from_fields(fields),
            Some(other) => Party {
                name: value_text(other).unwrap_or_default(),
                ..Party::default()
            },
            None => Party::default(),
        };
        if party.url.is_none() {
            party.url = party
                .website
                .as_deref()
                .filter(|w| !w.is_empty())
                .and_then(|w| normalize_url_with(Some(w), &self.url_scheme));
        }
        party
    }
}

impl Default for InvoiceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowNormalizer for InvoiceNormalizer {
    fn normalize(&self, row: Option<&RawRow>) -> Result<Normalized> {
        let mut row = row.cloned().ok_or(ValidationError::NoRowSelected)?;

        if merge_references(&mut row)? {
            debug!("Merged References into row");
        }

        let items = self.items.normalize(row.field("Items"));
        row.insert(
            "Items",
            Value::Array(items.iter().map(LineItem::to_value).collect()),
        );

        if let Some(totals) = apply_totals(&mut row, &items) {
            debug!(subtotal = %totals.subtotal, total = %totals.total, "Synthesized totals");
        }

        self.derive_invoicer_url(&mut row);

        if PlaceholderFiller::is_template(&row) {
            debug!("Row has no Issued or Due column, filling header placeholders");
        }
        self.filler.fill(&mut row);

        let invoice = self.assemble(&row, items);
        debug!("Normalized invoice with {} items", invoice.items.len());

        Ok(Normalized { invoice, row })
    }
}

fn party_from_fields(fields: &Map<String, Value>) -> Party {
    let text = |key: &str| fields.get(key).and_then(value_text);
    let optional = |key: &str| text(key).filter(|s| !s.is_empty());

    Party {
        name: text("Name").unwrap_or_default(),
        street1: text("Street1").unwrap_or_default(),
        street2: optional("Street2"),
        city: text("City").unwrap_or_default(),
        state: text("State").unwrap_or_default(),
        zip: text("Zip").unwrap_or_default(),
        email: optional("Email"),
        phone: optional("Phone"),
        website: optional("Website"),
        url: optional("Url"),
    }
}
