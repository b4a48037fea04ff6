use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SqlError {
    #[error("No data")]
    NoUpdateData,

    #[error("Unknown filter: {0}")]
    UnknownFilterName(String),

    #[error("Invalid {dimension} range: minimum {min} exceeds maximum {max}")]
    InvalidFilterRange {
        dimension: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Invalid value for filter {name}: expected {expected}")]
    InvalidFilterValue {
        name: String,
        expected: &'static str,
    },
}
