use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use super::error::SqlError;
use super::types::{BoundSide, RangeBound, ValueKind};

/// Every filter a client may apply to a listing. Each variant knows the
/// predicate it renders and the value it binds; the builders never branch
/// on a particular filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    MinEmployees,
    MaxEmployees,
    CompanyNameLike,
    JobTitleLike,
    MinSalary,
    MaxSalary,
    HasEquity,
}

impl FilterKind {
    /// Registry entries. A new filter is one variant here plus its arms below.
    pub const ALL: [FilterKind; 7] = [
        FilterKind::MinEmployees,
        FilterKind::MaxEmployees,
        FilterKind::CompanyNameLike,
        FilterKind::JobTitleLike,
        FilterKind::MinSalary,
        FilterKind::MaxSalary,
        FilterKind::HasEquity,
    ];

    /// External key clients use in query strings.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::MinEmployees => "minEmployees",
            FilterKind::MaxEmployees => "maxEmployees",
            FilterKind::CompanyNameLike => "nameLike",
            FilterKind::JobTitleLike => "title",
            FilterKind::MinSalary => "minSalary",
            FilterKind::MaxSalary => "maxSalary",
            FilterKind::HasEquity => "hasEquity",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            FilterKind::MinEmployees
            | FilterKind::MaxEmployees
            | FilterKind::MinSalary
            | FilterKind::MaxSalary => ValueKind::Number,
            FilterKind::CompanyNameLike | FilterKind::JobTitleLike => ValueKind::Text,
            FilterKind::HasEquity => ValueKind::Boolean,
        }
    }

    pub fn range_bound(&self) -> Option<RangeBound> {
        let (dimension, side) = match self {
            FilterKind::MinEmployees => ("employees", BoundSide::Min),
            FilterKind::MaxEmployees => ("employees", BoundSide::Max),
            FilterKind::MinSalary => ("salary", BoundSide::Min),
            FilterKind::MaxSalary => ("salary", BoundSide::Max),
            _ => return None,
        };
        Some(RangeBound { dimension, side })
    }

    /// SQL predicate referencing the 1-based placeholder `$index`.
    pub fn render(&self, index: usize) -> String {
        match self {
            FilterKind::MinEmployees => format!("num_employees >= ${}", index),
            FilterKind::MaxEmployees => format!("num_employees <= ${}", index),
            FilterKind::CompanyNameLike => format!("name ILIKE ${}", index),
            FilterKind::JobTitleLike => format!("title ILIKE ${}", index),
            FilterKind::MinSalary => format!("salary >= ${}", index),
            FilterKind::MaxSalary => format!("salary <= ${}", index),
            // false binds a predicate that is always true
            FilterKind::HasEquity => format!("(equity > 0 OR NOT ${})", index),
        }
    }

    /// Value actually bound to the placeholder for a raw operand.
    pub fn bound_value(&self, raw: &Value) -> Value {
        match (self, raw) {
            (FilterKind::CompanyNameLike | FilterKind::JobTitleLike, Value::String(s)) => {
                Value::String(format!("%{}%", s))
            }
            _ => raw.clone(),
        }
    }
}

/// One filter applied to one request's operand.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterInstance<'a> {
    kind: FilterKind,
    raw: &'a Value,
}

impl<'a> FilterInstance<'a> {
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn render(&self, index: usize) -> String {
        self.kind.render(index)
    }

    pub fn bound_value(&self) -> Value {
        self.kind.bound_value(self.raw)
    }
}

/// Name to filter lookup, built once and only read afterwards.
pub struct FilterRegistry {
    by_name: HashMap<&'static str, FilterKind>,
}

static REGISTRY: Lazy<FilterRegistry> = Lazy::new(|| FilterRegistry::from_kinds(&FilterKind::ALL));

impl FilterRegistry {
    pub fn global() -> &'static FilterRegistry {
        &REGISTRY
    }

    fn from_kinds(kinds: &[FilterKind]) -> Self {
        Self {
            by_name: kinds.iter().map(|k| (k.name(), *k)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<FilterKind> {
        self.by_name.get(name).copied()
    }

    /// Resolve every entry of `filters`, in its iteration order, to a filter
    /// instance. Fails before anything is built if a name is unregistered, an
    /// operand has the wrong type, or a min/max pair is inverted.
    pub fn build_filters<'a>(
        &self,
        filters: &'a Map<String, Value>,
    ) -> Result<Vec<FilterInstance<'a>>, SqlError> {
        let resolved = filters
            .iter()
            .map(|(name, raw)| {
                let kind = self
                    .lookup(name)
                    .ok_or_else(|| SqlError::UnknownFilterName(name.clone()))?;
                let expected = kind.value_kind();
                if !expected.accepts(raw) {
                    return Err(SqlError::InvalidFilterValue {
                        name: name.clone(),
                        expected: expected.describe(),
                    });
                }
                Ok((kind, raw))
            })
            .collect::<Result<Vec<_>, SqlError>>()?;

        validate_ranges(&resolved)?;

        Ok(resolved
            .into_iter()
            .map(|(kind, raw)| FilterInstance { kind, raw })
            .collect())
    }
}

/// Reject any dimension whose minimum exceeds its maximum.
fn validate_ranges(resolved: &[(FilterKind, &Value)]) -> Result<(), SqlError> {
    let mut ranges: Vec<(&'static str, Option<f64>, Option<f64>)> = Vec::new();

    for (kind, raw) in resolved {
        let (Some(bound), Some(value)) = (kind.range_bound(), raw.as_f64()) else {
            continue;
        };
        let idx = match ranges.iter().position(|(d, _, _)| *d == bound.dimension) {
            Some(idx) => idx,
            None => {
                ranges.push((bound.dimension, None, None));
                ranges.len() - 1
            }
        };
        match bound.side {
            BoundSide::Min => ranges[idx].1 = Some(value),
            BoundSide::Max => ranges[idx].2 = Some(value),
        }
    }

    for (dimension, min, max) in ranges {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(SqlError::InvalidFilterRange { dimension, min, max });
            }
        }
    }
    Ok(())
}
