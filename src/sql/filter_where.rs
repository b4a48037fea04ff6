use serde_json::{Map, Value};

use super::error::SqlError;
use super::filter::FilterRegistry;
use super::types::WhereClause;

/// Build a `WHERE` clause from filter-name/value pairs.
///
/// Predicates appear in the map's iteration order and are joined with `AND`;
/// the n-th predicate references `$n` and `values[n - 1]` is its operand. An
/// empty map yields an empty clause with no values.
pub fn sql_for_filter(filters: &Map<String, Value>) -> Result<WhereClause, SqlError> {
    if filters.is_empty() {
        return Ok(WhereClause::default());
    }

    let instances = FilterRegistry::global().build_filters(filters)?;

    let mut predicates = Vec::with_capacity(instances.len());
    let mut values = Vec::with_capacity(instances.len());
    for filter in &instances {
        predicates.push(filter.render(values.len() + 1));
        values.push(filter.bound_value());
    }

    let where_clause = format!("WHERE {}", predicates.join(" AND "));
    if crate::config::CONFIG.filter.debug_logging {
        tracing::debug!(%where_clause, params = values.len(), "built filter clause");
    }

    Ok(WhereClause { where_clause, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_filters_produce_no_clause() {
        let result = sql_for_filter(&Map::new()).unwrap();
        assert_eq!(result.where_clause, "");
        assert!(result.values.is_empty());
    }

    #[test]
    fn single_filter() {
        let result = sql_for_filter(&map(json!({ "minEmployees": 10 }))).unwrap();
        assert_eq!(result.where_clause, "WHERE num_employees >= $1");
        assert_eq!(result.values, vec![json!(10)]);
    }

    #[test]
    fn multiple_filters_follow_input_order() {
        let filters = map(json!({
            "minEmployees": 10,
            "maxEmployees": 100,
            "nameLike": "testName"
        }));
        let result = sql_for_filter(&filters).unwrap();
        assert_eq!(
            result.where_clause,
            "WHERE num_employees >= $1 AND num_employees <= $2 AND name ILIKE $3"
        );
        assert_eq!(result.values, vec![json!(10), json!(100), json!("%testName%")]);
    }

    #[test]
    fn reordered_input_reorders_placeholders() {
        let filters = map(json!({ "nameLike": "net", "minEmployees": 3 }));
        let result = sql_for_filter(&filters).unwrap();
        assert_eq!(result.where_clause, "WHERE name ILIKE $1 AND num_employees >= $2");
        assert_eq!(result.values, vec![json!("%net%"), json!(3)]);
    }

    #[test]
    fn job_filters() {
        let filters = map(json!({ "title": "engineer", "minSalary": 50000, "hasEquity": true }));
        let result = sql_for_filter(&filters).unwrap();
        assert_eq!(
            result.where_clause,
            "WHERE title ILIKE $1 AND salary >= $2 AND (equity > 0 OR NOT $3)"
        );
        assert_eq!(result.values, vec![json!("%engineer%"), json!(50000), json!(true)]);
    }

    #[test]
    fn inverted_employee_range_fails() {
        let err = sql_for_filter(&map(json!({ "minEmployees": 50, "maxEmployees": 10 }))).unwrap_err();
        assert!(matches!(err, SqlError::InvalidFilterRange { dimension: "employees", .. }));
    }

    #[test]
    fn unknown_filter_fails() {
        let err = sql_for_filter(&map(json!({ "unknownKey": 1 }))).unwrap_err();
        assert_eq!(err, SqlError::UnknownFilterName("unknownKey".to_string()));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let filters = map(json!({ "minEmployees": 1, "nameLike": "x" }));
        assert_eq!(sql_for_filter(&filters).unwrap(), sql_for_filter(&filters).unwrap());
    }
}
