use serde_json::Value;
use sqlx::{
    self,
    postgres::{PgArguments, PgRow},
    FromRow, PgPool, Postgres,
};

use crate::database::manager::DatabaseError;

type PgQueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;

/// Run `sql` with `params` bound to `$1..$n` in order and collect every row.
pub async fn fetch_all<T>(pool: &PgPool, sql: &str, params: &[Value]) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let rows = bind_all(sqlx::query_as::<_, T>(sql), params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Like `fetch_all` but expects at most one row.
pub async fn fetch_optional<T>(
    pool: &PgPool,
    sql: &str,
    params: &[Value],
) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let row = bind_all(sqlx::query_as::<_, T>(sql), params)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

fn bind_all<'q, O>(mut q: PgQueryAs<'q, O>, params: &'q [Value]) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    for p in params {
        q = bind_param(q, p);
    }
    q
}

fn bind_param<'q, O>(q: PgQueryAs<'q, O>, v: &'q Value) -> PgQueryAs<'q, O>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            // int8 null assigns to text, integer and numeric columns alike
            let none: Option<i64> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
