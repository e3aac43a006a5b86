use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::Value;

use crate::utils::error::ActionError;

/// Largest amount a `NUMERIC(10, 2)` column holds.
const MAX_AMOUNT: &str = "99999999.99";

/// Longest amount text worth parsing; anything longer cannot fit the column.
const MAX_AMOUNT_TEXT_LEN: usize = 32;

/// Request fields normalised to strings, whichever encoding the client used.
#[derive(Debug, Default, Clone)]
pub struct RequestFields(HashMap<String, String>);

impl RequestFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Adds entries whose key is not already present.
    pub fn fill_missing(&mut self, extra: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in extra {
            self.0.entry(key).or_insert(value);
        }
    }

    /// Flattens a JSON object. Scalars are stringified, nulls are dropped and
    /// nested values are kept as their JSON text.
    pub fn from_json(value: Value) -> Result<Self, ActionError> {
        let Value::Object(map) = value else {
            return Err(ActionError::validation("Request body must be a JSON object"));
        };

        let mut fields = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => fields.insert(key, s),
                other => fields.insert(key, other.to_string()),
            }
        }

        Ok(fields)
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn trimmed(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

impl FromIterator<(String, String)> for RequestFields {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn validate_max_len(value: &str, max: usize, field_name: &str) -> Result<(), ActionError> {
    if value.chars().count() > max {
        return Err(ActionError::validation(format!(
            "{} must be at most {} characters",
            field_name, max
        )));
    }
    Ok(())
}

/// Parses a strictly positive amount and rounds it half-up to cents.
///
/// Only plain decimal text is accepted. Exponent notation is refused before
/// parsing, since rounding `1e99999999` would materialise the full integer.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, ActionError> {
    let raw = raw.trim();
    if raw.len() > MAX_AMOUNT_TEXT_LEN || raw.contains(['e', 'E']) {
        return Err(ActionError::validation("Amount must be a plain decimal number"));
    }

    let amount = BigDecimal::from_str(raw)
        .map_err(|_| ActionError::validation("Amount must be a number"))?
        .with_scale_round(2, RoundingMode::HalfUp);

    if amount <= BigDecimal::from(0) {
        return Err(ActionError::validation("Amount must be greater than zero"));
    }

    let max = BigDecimal::from_str(MAX_AMOUNT)
        .map_err(|e| ActionError::Internal(format!("bad amount limit: {}", e)))?;
    if amount > max {
        return Err(ActionError::validation("Amount is too large"));
    }

    Ok(amount)
}

pub fn parse_expense_id(fields: &RequestFields) -> Result<i32, ActionError> {
    fields
        .trimmed("id")
        .and_then(|raw| raw.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ActionError::validation("Invalid expense id"))
}
