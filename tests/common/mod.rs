#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use jobly_api::{app, config::DatabaseConfig, database::DatabaseManager, AppState};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tower::ServiceExt;

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

const SEED_SQL: &str = "
INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
  ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
  ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
  ('c3', 'C3', 3, 'Desc3', NULL);
INSERT INTO jobs (title, salary, equity, company_handle) VALUES
  ('Engineer', 100, 0, 'c1'),
  ('Senior Engineer', 200, 0.02, 'c1'),
  ('Manager', 300, NULL, 'c2');
";

static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Router over a pool that never connects. Requests rejected before any
/// query (auth, validation) complete without a database.
pub fn offline_app() -> Result<Router> {
    let config = DatabaseConfig {
        url: None,
        max_connections: 1,
        connection_timeout: 1,
    };
    let pool = DatabaseManager::connect_lazy("postgres://jobly@127.0.0.1:1/jobly_offline", &config)?;
    Ok(app(AppState::new(pool)))
}

pub fn admin_token() -> String {
    jobly_api::auth::create_token("admin", true).expect("token")
}

pub fn user_token() -> String {
    jobly_api::auth::create_token("u1", false).expect("token")
}

pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };

    let res = app.oneshot(req).await?;
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, payload))
}

/// Seeded database isolated in its own schema. Jobs 1 and 2 belong to c1,
/// job 3 to c2; c3 has none.
pub struct TestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

/// `None` when DATABASE_URL is unset, so database tests are skipped.
pub async fn test_db() -> Result<Option<TestDb>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return Ok(None);
    };

    let schema = format!(
        "jobly_test_{}_{}",
        std::process::id(),
        SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
    );
    let admin = PgPoolOptions::new().max_connections(1).connect(&url).await?;
    admin.execute(format!("CREATE SCHEMA {}", schema).as_str()).await?;

    let search_path = format!("SET search_path TO {}", schema);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .after_connect(move |conn, _meta| {
            let sql = search_path.clone();
            Box::pin(async move {
                conn.execute(sql.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await?;
    pool.execute(SCHEMA_SQL).await?;
    pool.execute(SEED_SQL).await?;

    Ok(Some(TestDb { pool, admin, schema }))
}

impl TestDb {
    pub fn app(&self) -> Router {
        app(AppState::new(self.pool.clone()))
    }

    pub async fn cleanup(self) -> Result<()> {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await?;
        Ok(())
    }
}

/// `field` of every object in a JSON array.
pub fn pluck(items: &Value, field: &str) -> Vec<Value> {
    items
        .as_array()
        .map(|items| items.iter().map(|item| item[field].clone()).collect())
        .unwrap_or_default()
}
