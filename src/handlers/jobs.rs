use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Map, Value};

use super::{json_body, query_pairs};
use super::params::{check_new, filters_from_query, update_fields, FieldKind, FieldRule};
use crate::app::AppState;
use crate::database::models::{Job, NewJob};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::sql::FilterKind;

pub const FILTERS: &[FilterKind] = &[
    FilterKind::JobTitleLike,
    FilterKind::MinSalary,
    FilterKind::MaxSalary,
    FilterKind::HasEquity,
];

const NEW_FIELDS: &[FieldRule] = &[
    FieldRule::new("salary", FieldKind::Count, true),
    FieldRule::new("equity", FieldKind::Fraction, true),
    FieldRule::new("companyHandle", FieldKind::Handle, false),
];

// company_handle is fixed once a job is posted
const UPDATABLE: &[FieldRule] = &[
    FieldRule::new("title", FieldKind::Text, false),
    FieldRule::new("salary", FieldKind::Count, true),
    FieldRule::new("equity", FieldKind::Fraction, true),
];

fn job_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::field_error("id", "must be an integer"))
}

/// GET /jobs - list jobs, optionally filtered by `title`, `minSalary`,
/// `maxSalary` and `hasEquity`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Value> {
    let filters = filters_from_query(query_pairs(query)?, FILTERS)?;
    let jobs = Job::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// POST /jobs - admin only
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<Value> {
    let data = json_body(body)?;
    check_new(&data, NEW_FIELDS)?;
    let job = Job::create(&state.pool, data).await?;
    tracing::info!("Created job {} for {}", job.id, job.company_handle);
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// GET /jobs/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let job = Job::get(&state.pool, job_id(path)?).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// PATCH /jobs/:id - admin only
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Value> {
    let id = job_id(path)?;
    let data = update_fields(json_body(body)?, UPDATABLE)?;
    let job = Job::update(&state.pool, id, &data).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id - admin only
pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let id = job_id(path)?;
    Job::remove(&state.pool, id).await?;
    tracing::info!("Deleted job {}", id);
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
