use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{fetch_all, fetch_optional};
use crate::sql::{sql_for_filter, sql_for_partial_update};

const COLUMNS: &str = "id, title, salary, equity, company_handle";

const FIELD_COLUMNS: &[(&str, &str)] = &[("companyHandle", "company_handle")];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(data.title.as_str())
            .bind(data.salary)
            .bind(data.equity)
            .bind(data.company_handle.as_str())
            .fetch_one(pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    DatabaseError::NotFound(format!("No company: {}", data.company_handle))
                }
                _ => DatabaseError::Sqlx(e),
            })?;
        Ok(job)
    }

    /// All jobs matching `filters`, newest first.
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Job>, DatabaseError> {
        let filter = sql_for_filter(filters)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM jobs {} ORDER BY id DESC",
            filter.where_clause
        );
        fetch_all(pool, &sql, &filter.values).await
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, DatabaseError> {
        sqlx::query_as::<_, Job>(&format!("SELECT {COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Partial update; the row id is bound after the changed fields.
    pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<Job, DatabaseError> {
        let set = sql_for_partial_update(data, FIELD_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.set_cols,
            set.values.len() + 1
        );
        let mut params = set.values;
        params.push(Value::from(id));

        fetch_optional(pool, &sql, &params)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("No job with id: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equity_serializes_as_decimal_string() {
        let job = Job {
            id: 1,
            title: "J1".to_string(),
            salary: Some(1),
            equity: Some(Decimal::new(2, 2)),
            company_handle: "c1".to_string(),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["equity"], json!("0.02"));
        assert_eq!(value["companyHandle"], json!("c1"));
    }

    #[test]
    fn new_job_accepts_numeric_or_string_equity() {
        let from_number: NewJob = serde_json::from_value(json!({
            "title": "t", "salary": 1, "equity": 0.5, "companyHandle": "c1"
        }))
        .unwrap();
        let from_string: NewJob = serde_json::from_value(json!({
            "title": "t", "equity": "0.5", "companyHandle": "c1"
        }))
        .unwrap();
        assert_eq!(from_number.equity, from_string.equity);
        assert_eq!(from_string.salary, None);
    }

    #[test]
    fn new_job_requires_company() {
        assert!(serde_json::from_value::<NewJob>(json!({ "title": "t" })).is_err());
    }
}
