mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

// None of these reach the database: each request fails validation first.

#[tokio::test]
async fn inverted_employee_range_is_a_bad_request() -> Result<()> {
    let (status, payload) = common::send(
        common::offline_app()?,
        "GET",
        "/companies?minEmployees=50&maxEmployees=10",
        None,
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn inverted_salary_range_is_a_bad_request() -> Result<()> {
    let (status, _) = common::send(
        common::offline_app()?,
        "GET",
        "/jobs?maxSalary=10&minSalary=5000",
        None,
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_query_key_is_rejected_before_building_sql() -> Result<()> {
    let (status, payload) =
        common::send(common::offline_app()?, "GET", "/companies?unknownKey=1", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["unknownKey"], "is not an allowed filter");
    Ok(())
}

#[tokio::test]
async fn job_filters_are_not_accepted_on_companies() -> Result<()> {
    let (status, _) =
        common::send(common::offline_app()?, "GET", "/companies?hasEquity=true", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_numeric_salary_is_rejected() -> Result<()> {
    let (status, payload) =
        common::send(common::offline_app()?, "GET", "/jobs?minSalary=lots", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["minSalary"], "must be a number");
    Ok(())
}

#[tokio::test]
async fn non_integer_job_id_is_rejected() -> Result<()> {
    let (status, payload) = common::send(common::offline_app()?, "GET", "/jobs/abc", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["id"], "must be an integer");
    Ok(())
}

#[tokio::test]
async fn job_company_cannot_be_changed() -> Result<()> {
    let token = common::admin_token();
    let (status, payload) = common::send(
        common::offline_app()?,
        "PATCH",
        "/jobs/1",
        Some(&token),
        Some(json!({ "companyHandle": "c2" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["companyHandle"], "cannot be updated");
    Ok(())
}

#[tokio::test]
async fn malformed_job_body_is_rejected() -> Result<()> {
    let token = common::admin_token();
    let (status, payload) = common::send(
        common::offline_app()?,
        "POST",
        "/jobs",
        Some(&token),
        Some(json!({ "title": "t", "salary": "lots", "companyHandle": "c1" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn undecodable_query_gets_a_json_error() -> Result<()> {
    // send() fails on a non-JSON body
    let (status, payload) =
        common::send(common::offline_app()?, "GET", "/companies?a=%zz", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], true);
    Ok(())
}

#[tokio::test]
async fn negative_salary_is_rejected_on_create() -> Result<()> {
    let token = common::admin_token();
    let (status, payload) = common::send(
        common::offline_app()?,
        "POST",
        "/jobs",
        Some(&token),
        Some(json!({ "title": "t", "salary": -5, "companyHandle": "c1" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["salary"], "must be a non-negative integer");
    Ok(())
}

#[tokio::test]
async fn equity_above_one_is_rejected_on_create() -> Result<()> {
    let token = common::admin_token();
    let (status, payload) = common::send(
        common::offline_app()?,
        "POST",
        "/jobs",
        Some(&token),
        Some(json!({ "title": "t", "equity": 1.5, "companyHandle": "c1" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["equity"], "must be a number between 0 and 1");
    Ok(())
}

#[tokio::test]
async fn company_handle_must_be_lowercase_and_short() -> Result<()> {
    let token = common::admin_token();
    for handle in ["Upper", "a-handle-well-over-25-chars"] {
        let (status, payload) = common::send(
            common::offline_app()?,
            "POST",
            "/companies",
            Some(&token),
            Some(json!({ "handle": handle, "name": "N", "description": "d" })),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["field_errors"]["handle"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn negative_employee_count_is_rejected_on_update() -> Result<()> {
    let token = common::admin_token();
    let (status, payload) = common::send(
        common::offline_app()?,
        "PATCH",
        "/companies/c1",
        Some(&token),
        Some(json!({ "numEmployees": -5 })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["field_errors"]["numEmployees"], "must be a non-negative integer");
    Ok(())
}
