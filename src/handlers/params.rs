//! Request validation: query strings become ordered filter maps, and create
//! and update bodies are checked against the column rules before any query.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::ApiError;
use crate::sql::{FilterKind, ValueKind};
use crate::util::{to_bool_or_null, to_num_or_null};

/// Turn query-string pairs into the filter map for `sql_for_filter`,
/// keeping their order. Only the resource's `allowed` filters pass.
pub fn filters_from_query(
    pairs: Vec<(String, String)>,
    allowed: &[FilterKind],
) -> Result<Map<String, Value>, ApiError> {
    let mut filters = Map::new();
    for (name, raw) in pairs {
        let kind = allowed
            .iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ApiError::field_error(&name, "is not an allowed filter"))?;
        if filters.contains_key(&name) {
            return Err(ApiError::field_error(name, "was given more than once"));
        }
        let expected = kind.value_kind();
        let value = coerce(expected, &raw)
            .ok_or_else(|| ApiError::field_error(&name, format!("must be {}", expected.describe())))?;
        filters.insert(name, value);
    }
    Ok(filters)
}

fn coerce(kind: ValueKind, raw: &str) -> Option<Value> {
    match kind {
        ValueKind::Number => to_num_or_null(raw).and_then(number_value),
        ValueKind::Boolean => to_bool_or_null(raw).map(Value::Bool),
        ValueKind::Text => Some(Value::String(raw.to_string())),
    }
}

fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Lowercase key of at most 25 characters
    Handle,
    /// Integer in `0..=i32::MAX`
    Count,
    /// Number in `0..=1`, given as a JSON number or numeric string
    Fraction,
}

const HANDLE_MAX_LEN: usize = 25;

/// A field a client may set, and what its value must look like.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind, nullable: bool) -> Self {
        Self { name, kind, nullable }
    }
}

/// Check an update body against `allowed`, normalising values for binding.
/// An empty body passes through; the update builder rejects it.
pub fn update_fields(
    body: Map<String, Value>,
    allowed: &[FieldRule],
) -> Result<Map<String, Value>, ApiError> {
    let mut data = Map::new();
    for (name, value) in body {
        let field = allowed
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| ApiError::field_error(&name, "cannot be updated"))?;
        let value = normalise(field, value).map_err(|problem| ApiError::field_error(&name, problem))?;
        data.insert(name, value);
    }
    Ok(data)
}

/// Check a deserialized create body against `rules`. Shape and required
/// fields are already enforced by its type; this applies the value rules.
pub fn check_new<T: Serialize>(body: &T, rules: &[FieldRule]) -> Result<(), ApiError> {
    let value = serde_json::to_value(body).map_err(|e| {
        tracing::error!("Failed to inspect request body: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;
    for rule in rules {
        if let Some(field) = value.get(rule.name) {
            normalise(rule, field.clone()).map_err(|problem| ApiError::field_error(rule.name, problem))?;
        }
    }
    Ok(())
}

fn normalise(field: &FieldRule, value: Value) -> Result<Value, &'static str> {
    if value.is_null() {
        return if field.nullable { Ok(Value::Null) } else { Err("cannot be null") };
    }
    match field.kind {
        FieldKind::Text => value.is_string().then_some(value).ok_or("must be a string"),
        FieldKind::Handle => match value.as_str() {
            Some(s) if !s.is_empty() && s.len() <= HANDLE_MAX_LEN && s == s.to_lowercase() => Ok(value),
            _ => Err("must be lowercase and 1 to 25 characters"),
        },
        FieldKind::Count => value
            .as_i64()
            .filter(|n| *n >= 0 && i32::try_from(*n).is_ok())
            .map(Value::from)
            .ok_or("must be a non-negative integer"),
        FieldKind::Fraction => {
            let n = match &value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => to_num_or_null(s),
                _ => None,
            };
            n.filter(|n| (0.0..=1.0).contains(n))
                .and_then(|n| Number::from_f64(n).map(Value::Number))
                .ok_or("must be a number between 0 and 1")
        }
    }
}
