use serde_json::Value;

/// Output of `sql_for_filter`: an optional `WHERE ...` clause and the values
/// bound to its `$N` placeholders, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub where_clause: String,
    pub values: Vec<Value>,
}

/// Output of `sql_for_partial_update`: the body of a `SET` clause and its
/// bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub set_cols: String,
    pub values: Vec<Value>,
}

/// JSON shape a filter operand must have before it can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Boolean,
}

impl ValueKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ValueKind::Number => "a number",
            ValueKind::Text => "a string",
            ValueKind::Boolean => "a boolean",
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::Number => value.is_number(),
            ValueKind::Text => value.is_string(),
            ValueKind::Boolean => value.is_boolean(),
        }
    }
}

/// Which end of a range a filter constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Min,
    Max,
}

/// A filter that bounds a named quantity, e.g. `employees` or `salary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBound {
    pub dimension: &'static str,
    pub side: BoundSide,
}
