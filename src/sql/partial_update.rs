use serde_json::{Map, Value};

use super::error::SqlError;
use super::types::SetClause;

/// Build the body of an `UPDATE ... SET` from the fields being changed.
///
/// `field_to_column` renames application field names to column names; a
/// field without an entry is used as the column name verbatim. Assignments
/// and values follow `data`'s iteration order, so `"col"=$n` binds
/// `values[n - 1]`. Values are passed through untouched.
///
/// ```ignore
/// // { firstName: "Aliya", age: 32 } with firstName -> first_name
/// // set_cols: "first_name"=$1, "age"=$2   values: ["Aliya", 32]
/// ```
pub fn sql_for_partial_update(
    data: &Map<String, Value>,
    field_to_column: &[(&str, &str)],
) -> Result<SetClause, SqlError> {
    if data.is_empty() {
        return Err(SqlError::NoUpdateData);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (field, value)) in data.iter().enumerate() {
        let column = field_to_column
            .iter()
            .find(|(f, _)| *f == field.as_str())
            .map(|(_, c)| *c)
            .unwrap_or(field.as_str());
        cols.push(format!("{}=${}", quote_identifier(column), idx + 1));
        values.push(value.clone());
    }

    Ok(SetClause {
        set_cols: cols.join(", "),
        values,
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
