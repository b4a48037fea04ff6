use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Map, Value};

use super::{json_body, query_pairs};
use super::params::{check_new, filters_from_query, update_fields, FieldKind, FieldRule};
use crate::app::AppState;
use crate::database::models::{Company, NewCompany};
use crate::middleware::{ApiResponse, ApiResult};
use crate::sql::FilterKind;

pub const FILTERS: &[FilterKind] = &[
    FilterKind::MinEmployees,
    FilterKind::MaxEmployees,
    FilterKind::CompanyNameLike,
];

const NEW_FIELDS: &[FieldRule] = &[
    FieldRule::new("handle", FieldKind::Handle, false),
    FieldRule::new("numEmployees", FieldKind::Count, true),
];

const UPDATABLE: &[FieldRule] = &[
    FieldRule::new("name", FieldKind::Text, false),
    FieldRule::new("description", FieldKind::Text, false),
    FieldRule::new("numEmployees", FieldKind::Count, true),
    FieldRule::new("logoUrl", FieldKind::Text, true),
];

/// GET /companies - list companies, optionally filtered by
/// `minEmployees`, `maxEmployees` and `nameLike`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Value> {
    let filters = filters_from_query(query_pairs(query)?, FILTERS)?;
    let companies = Company::find_all(&state.pool, &filters).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// POST /companies - admin only
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> ApiResult<Value> {
    let data = json_body(body)?;
    check_new(&data, NEW_FIELDS)?;
    let company = Company::create(&state.pool, data).await?;
    tracing::info!("Created company {}", company.handle);
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// GET /companies/:handle - company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// PATCH /companies/:handle - admin only
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Value> {
    let data = update_fields(json_body(body)?, UPDATABLE)?;
    let company = Company::update(&state.pool, &handle, &data).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle - admin only
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    Company::remove(&state.pool, &handle).await?;
    tracing::info!("Deleted company {}", handle);
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
