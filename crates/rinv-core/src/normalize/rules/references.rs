//! `References` indirection.

use serde_json::Value;

use crate::error::ValidationError;
use crate::models::row::{is_truthy, RawRow};

/// Column holding a linked record whose fields override the row's own.
pub const REFERENCES: &str = "References";

/// Shallow-merge `References` over the row. Returns whether a merge happened.
///
/// Empty cells (`""`, `0`, `false`) mean there is no linked record.
pub fn merge_references(row: &mut RawRow) -> Result<bool, ValidationError> {
    let references = match row.field(REFERENCES) {
        Some(Value::Object(fields)) => fields.clone(),
        Some(other) if is_truthy(other) => return Err(ValidationError::References),
        _ => return Ok(false),
    };
    row.merge(&references);
    Ok(true)
}
