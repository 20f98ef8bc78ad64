//! Placeholder ("labels") mode.
//!
//! A freshly connected table rarely has every column the template expects.
//! Missing slots are filled with their own names so the rendered template
//! shows where each column's data will appear.

use serde_json::{json, Map, Value};

use crate::models::row::{is_truthy, RawRow};

use super::items::PLACEHOLDER_DESCRIPTION;

/// Header fields labeled with their own name in an empty template.
pub const HEADER_FIELDS: [&str; 7] = [
    "Number", "Issued", "Due", "Subtotal", "Deduction", "Taxes", "Total",
];

/// Default note for an empty template.
pub const NOTE_GUIDANCE: &str = "(Anything in a Note column goes here)";

const INVOICER_FIELDS: [&str; 9] = [
    "Name", "Street1", "Street2", "City", "State", "Zip", "Email", "Phone", "Website",
];

const CLIENT_FIELDS: [&str; 6] = ["Name", "Street1", "Street2", "City", "State", "Zip"];

/// Fills missing structural fields with self-describing labels.
///
/// Every fill only triggers on absence, so filling is idempotent.
#[derive(Debug, Clone)]
pub struct PlaceholderFiller {
    note_guidance: String,
    item_description: String,
}

impl PlaceholderFiller {
    pub fn new() -> Self {
        Self {
            note_guidance: NOTE_GUIDANCE.to_string(),
            item_description: PLACEHOLDER_DESCRIPTION.to_string(),
        }
    }

    /// Set the note shown in an empty template.
    pub fn with_note_guidance(mut self, note: impl Into<String>) -> Self {
        self.note_guidance = note.into();
        self
    }

    /// Set the placeholder item description.
    pub fn with_item_description(mut self, description: impl Into<String>) -> Self {
        self.item_description = description.into();
        self
    }

    /// A row without `Issued` and `Due` columns is treated as an empty template.
    pub fn is_template(row: &RawRow) -> bool {
        !row.has("Issued") && !row.has("Due")
    }

    /// Fill placeholders in place.
    pub fn fill(&self, row: &mut RawRow) {
        if Self::is_template(row) {
            for field in HEADER_FIELDS {
                row.insert_missing(field, field);
            }
            row.insert_missing("Note", self.note_guidance.as_str());
        }

        if !row.field("Invoicer").is_some_and(is_truthy) {
            row.insert("Invoicer", placeholder_party("Invoicer", &INVOICER_FIELDS));
        }
        if !row.field("Client").is_some_and(is_truthy) {
            row.insert("Client", placeholder_party("Client", &CLIENT_FIELDS));
        }
        if row.field("Items").is_none() {
            row.insert(
                "Items",
                json!([{ "Description": self.item_description, "Total": 0 }]),
            );
        }
    }

    /// Return a filled copy of `row`.
    pub fn filled(&self, row: &RawRow) -> RawRow {
        let mut row = row.clone();
        self.fill(&mut row);
        row
    }
}

impl Default for PlaceholderFiller {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill placeholders with default settings.
pub fn fill_placeholders(row: &mut RawRow) {
    PlaceholderFiller::new().fill(row);
}

/// A party whose every attribute is labeled `<prefix>.<Field>`.
pub fn placeholder_party(prefix: &str, fields: &[&str]) -> Value {
    let labeled: Map<String, Value> = fields
        .iter()
        .map(|field| (field.to_string(), Value::String(format!("{}.{}", prefix, field))))
        .collect();
    Value::Object(labeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(value: Value) -> RawRow {
        RawRow::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_row_gets_labels() {
        let filled = PlaceholderFiller::new().filled(&RawRow::new());

        for field in HEADER_FIELDS {
            assert_eq!(filled.text(field).as_deref(), Some(field));
        }
        assert_eq!(filled.text("Note").as_deref(), Some(NOTE_GUIDANCE));
        assert_eq!(filled.object("Invoicer").unwrap()["Name"], json!("Invoicer.Name"));
        assert_eq!(filled.object("Invoicer").unwrap()["Website"], json!("Invoicer.Website"));
        assert_eq!(filled.object("Client").unwrap()["Zip"], json!("Client.Zip"));
        assert!(filled.object("Client").unwrap().get("Email").is_none());
        assert_eq!(
            filled.field("Items"),
            Some(&json!([{"Description": "Items[0].Description", "Total": 0}]))
        );
    }

    #[test]
    fn test_real_data_keeps_header_blank() {
        let filled = PlaceholderFiller::new().filled(&row(json!({"Issued": 1700000000})));

        assert!(!filled.has("Number"));
        assert!(!filled.has("Note"));
        assert!(!filled.has("Total"));
        assert!(filled.object("Invoicer").is_some());
    }

    #[test]
    fn test_null_issued_still_counts_as_present() {
        let filled = PlaceholderFiller::new().filled(&row(json!({"Due": null})));
        assert!(!filled.has("Number"));
    }

    #[test]
    fn test_existing_values_untouched() {
        let source = row(json!({
            "Number": 42,
            "Invoicer": {"Name": "Real Co"},
            "Client": null,
            "Items": []
        }));
        let filled = PlaceholderFiller::new().filled(&source);

        assert_eq!(filled.field("Number"), Some(&json!(42)));
        assert_eq!(filled.text("Issued").as_deref(), Some("Issued"));
        assert_eq!(filled.object("Invoicer").unwrap()["Name"], json!("Real Co"));
        assert_eq!(filled.object("Client").unwrap()["Name"], json!("Client.Name"));
        assert_eq!(filled.field("Items"), Some(&json!([])));
    }

    #[test]
    fn test_empty_party_cells_get_labels() {
        let filled = PlaceholderFiller::new().filled(&row(json!({
            "Issued": 1,
            "Invoicer": "",
            "Client": 0
        })));

        assert_eq!(filled.object("Invoicer").unwrap()["Name"], json!("Invoicer.Name"));
        assert_eq!(filled.object("Client").unwrap()["Name"], json!("Client.Name"));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let filler = PlaceholderFiller::new();
        let samples = [
            RawRow::new(),
            row(json!({"Issued": "2024-01-05"})),
            row(json!({"Note": null, "Client": {"Name": "C"}, "Items": "bad"})),
            row(json!({"Due": 1, "Invoicer": null})),
        ];

        for sample in samples {
            let once = filler.filled(&sample);
            assert_eq!(filler.filled(&once), once);
        }
    }

    #[test]
    fn test_custom_guidance() {
        let filled = PlaceholderFiller::new()
            .with_note_guidance("Add a Note column")
            .filled(&RawRow::new());
        assert_eq!(filled.text("Note").as_deref(), Some("Add a Note column"));
    }
}
