//! Presentation formatting for invoice cells.
//!
//! Every function here is total: values that cannot be formatted are shown
//! as they are rather than raising.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::config::FormatConfig;
use crate::models::invoice::Scalar;

/// Currency and date formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    currency_symbol: String,
    date_format: String,
    missing: String,
}

impl Formatter {
    /// Create a formatter with US-style defaults (`$1,234.50`, `January 05, 2024`).
    pub fn new() -> Self {
        Self::from_config(&FormatConfig::default())
    }

    pub fn from_config(config: &FormatConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            date_format: config.date_format.clone(),
            missing: config.missing.clone(),
        }
    }

    /// Format a money cell.
    pub fn currency(&self, value: &Scalar) -> String {
        match value {
            Scalar::Number(amount) => self.format_amount(*amount),
            Scalar::Text(text) if !text.is_empty() => text.clone(),
            _ => self.missing.clone(),
        }
    }

    /// Format a decimal amount with symbol, thousands separators and two places.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let digits = format!("{:.2}", rounded.abs());
        let (integer_part, decimal_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{}{}{}.{}",
            sign,
            self.currency_symbol,
            group_thousands(integer_part),
            decimal_part
        )
    }

    /// Format a date cell. Numbers are unix seconds.
    pub fn date(&self, value: &Scalar) -> String {
        match value {
            Scalar::Number(seconds) => match timestamp_date(*seconds) {
                Some(date) => self.format_naive_date(date),
                None => seconds.to_string(),
            },
            Scalar::Text(text) => match parse_date(text) {
                Some(date) => self.format_naive_date(date),
                None => text.clone(),
            },
            Scalar::Empty => String::new(),
        }
    }

    fn format_naive_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            return date.to_string();
        }
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a money cell with default settings.
pub fn format_currency(value: &Scalar) -> String {
    Formatter::new().currency(value)
}

/// Format a date cell with default settings.
pub fn format_date(value: &Scalar) -> String {
    Formatter::new().date(value)
}

fn timestamp_date(seconds: Decimal) -> Option<NaiveDate> {
    let secs = seconds.trunc().to_i64()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    grouped
}
