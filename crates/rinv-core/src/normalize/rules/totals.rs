//! Subtotal and total synthesis.

use rust_decimal::Decimal;

use crate::models::invoice::LineItem;
use crate::models::row::{decimal_to_value, is_truthy, RawRow};

/// Computed invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub total: Decimal,
}

/// Totals are recomputed unless the row supplies both `Subtotal` and `Total`.
///
/// An empty cell (`0`, `""`) counts as not supplied.
pub fn needs_totals(row: &RawRow) -> bool {
    let supplied = |key: &str| row.field(key).is_some_and(is_truthy);
    !supplied("Subtotal") || !supplied("Total")
}

/// `subtotal = Σ item totals`, `total = subtotal + taxes − deduction`.
pub fn compute_totals(items: &[LineItem], taxes: Option<Decimal>, deduction: Option<Decimal>) -> Totals {
    let subtotal = items
        .iter()
        .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.total));
    let total = subtotal
        .saturating_add(taxes.unwrap_or(Decimal::ZERO))
        .saturating_sub(deduction.unwrap_or(Decimal::ZERO));
    Totals { subtotal, total }
}

/// Write synthesized totals into the row when needed.
pub fn apply_totals(row: &mut RawRow, items: &[LineItem]) -> Option<Totals> {
    if !needs_totals(row) {
        return None;
    }
    let totals = compute_totals(items, row.amount("Taxes"), row.amount("Deduction"));
    row.insert("Subtotal", decimal_to_value(totals.subtotal));
    row.insert("Total", decimal_to_value(totals.total));
    Some(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(total: i64) -> LineItem {
        LineItem {
            description: "x".into(),
            quantity: None,
            price: None,
            total: Decimal::new(total, 0),
        }
    }

    #[test]
    fn test_sums_items() {
        let totals = compute_totals(&[item(10), item(5)], None, None);
        assert_eq!(totals.subtotal, Decimal::new(15, 0));
        assert_eq!(totals.total, Decimal::new(15, 0));
    }

    #[test]
    fn test_taxes_and_deduction() {
        let totals = compute_totals(&[item(100)], Some(Decimal::new(8, 0)), Some(Decimal::new(20, 0)));
        assert_eq!(totals.total, Decimal::new(88, 0));
    }

    #[test]
    fn test_recomputes_when_either_is_missing() {
        let mut row = RawRow::from_value(json!({"Subtotal": 99, "Taxes": "2.5"})).unwrap();
        let totals = apply_totals(&mut row, &[item(10)]).unwrap();

        assert_eq!(totals.subtotal, Decimal::new(10, 0));
        assert_eq!(row.field("Subtotal"), Some(&json!(10)));
        assert_eq!(row.field("Total"), Some(&json!(12.5)));
    }

    #[test]
    fn test_keeps_explicit_pair() {
        let mut row = RawRow::from_value(json!({"Subtotal": 99, "Total": 120})).unwrap();
        assert_eq!(apply_totals(&mut row, &[item(10)]), None);
        assert_eq!(row.field("Total"), Some(&json!(120)));
    }

    #[test]
    fn test_zero_cells_are_recomputed() {
        let mut row = RawRow::from_value(json!({"Subtotal": 0, "Total": 0})).unwrap();
        let totals = apply_totals(&mut row, &[item(10), item(5)]).unwrap();
        assert_eq!(totals.subtotal, Decimal::new(15, 0));
        assert_eq!(row.field("Total"), Some(&json!(15)));

        let row = RawRow::from_value(json!({"Subtotal": "", "Total": 20})).unwrap();
        assert!(needs_totals(&row));
    }

    #[test]
    fn test_non_numeric_taxes_count_as_zero() {
        let mut row = RawRow::from_value(json!({"Taxes": "Taxes", "Deduction": null})).unwrap();
        let totals = apply_totals(&mut row, &[item(7)]).unwrap();
        assert_eq!(totals.total, Decimal::new(7, 0));
    }
}
