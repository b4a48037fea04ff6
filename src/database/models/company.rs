use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{fetch_all, fetch_optional};
use crate::sql::{sql_for_filter, sql_for_partial_update};

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

/// Application field names that differ from their column names.
const FIELD_COLUMNS: &[(&str, &str)] = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job as listed on its company.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

impl Company {
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, DatabaseError> {
        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&sql)
            .bind(data.handle.as_str())
            .bind(data.name.as_str())
            .bind(data.description.as_str())
            .bind(data.num_employees)
            .bind(data.logo_url.as_deref())
            .fetch_one(pool)
            .await
            .map_err(|e| DatabaseError::on_write(e, || format!("Duplicate company: {}", data.handle)))
    }

    /// All companies matching `filters` (see the filter registry), by name.
    pub async fn find_all(pool: &PgPool, filters: &Map<String, Value>) -> Result<Vec<Company>, DatabaseError> {
        let filter = sql_for_filter(filters)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies {} ORDER BY name",
            filter.where_clause
        );
        fetch_all(pool, &sql, &filter.values).await
    }

    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COLUMNS} FROM companies WHERE handle = $1"
        ))
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(handle))?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; only the fields present in `data` change.
    pub async fn update(
        pool: &PgPool,
        handle: &str,
        data: &Map<String, Value>,
    ) -> Result<Company, DatabaseError> {
        let set = sql_for_partial_update(data, FIELD_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.set_cols,
            set.values.len() + 1
        );
        let mut params = set.values;
        params.push(Value::String(handle.to_string()));

        fetch_optional(pool, &sql, &params)
            .await
            .map_err(|e| DatabaseError::on_write(e, || "Duplicate company name".to_string()))?
            .ok_or_else(|| not_found(handle))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
            .bind(handle)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(handle));
        }
        Ok(())
    }
}

fn not_found(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}
