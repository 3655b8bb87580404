use axum::http::StatusCode;
use serde_json::json;

use super::common::{coupon_body, future_date, send, test_app};

#[tokio::test]
async fn health_reports_ok() {
    let (_dir, app) = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_then_get_round_trip() {
    let (_dir, app) = test_app();

    let expiration = future_date();
    let (status, created) = send(
        &app,
        "POST",
        "/coupons",
        Some(json!({
            "code": "WELCOME10",
            "description": "10% off for new users",
            "value": 10,
            "expirationDate": expiration,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/coupons/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["code"], "WELCOME10");
    assert_eq!(fetched["value"].as_f64().unwrap(), 10.0);
    assert_eq!(fetched["status"], "active");
    assert_eq!(fetched["expirationDate"], created["expirationDate"]);
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let (_dir, app) = test_app();

    // Missing required field
    let (status, body) = send(&app, "POST", "/coupons", Some(json!({ "code": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");

    // Negative value
    let (status, body) = send(
        &app,
        "POST",
        "/coupons",
        Some(coupon_body("NEG", -1.0, &future_date())),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");

    // Unparseable expiration date
    let (status, body) = send(
        &app,
        "POST",
        "/coupons",
        Some(coupon_body("DATE", 5.0, "not-a-date")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");

    // Unknown status variant
    let (status, body) = send(
        &app,
        "POST",
        "/coupons",
        Some(json!({
            "code": "BAD",
            "description": "bad status",
            "value": 5,
            "expirationDate": future_date(),
            "status": "paused",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn create_duplicate_code_conflicts() {
    let (_dir, app) = test_app();

    let body = coupon_body("DUP", 5.0, &future_date());
    let (status, _) = send(&app, "POST", "/coupons", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(&app, "POST", "/coupons", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "conflict");
}

#[tokio::test]
async fn list_filters_by_value_range() {
    let (_dir, app) = test_app();

    for (code, value) in [("LOW", 3.0), ("MID", 7.0), ("HIGH", 12.0)] {
        let (status, _) = send(
            &app,
            "POST",
            "/coupons",
            Some(coupon_body(code, value, &future_date())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/coupons?minValue=5&maxValue=10", None).await;
    assert_eq!(status, StatusCode::OK);
    let coupons = body.as_array().unwrap();
    assert_eq!(coupons.len(), 1);
    assert_eq!(coupons[0]["code"], "MID");
}

#[tokio::test]
async fn list_rejects_bad_expires_before() {
    let (_dir, app) = test_app();
    let (status, body) = send(&app, "GET", "/coupons?expiresBefore=not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn get_missing_coupon_is_404() {
    let (_dir, app) = test_app();
    let (status, body) = send(&app, "GET", "/coupons/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let (_dir, app) = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/coupons",
        Some(coupon_body("EDIT", 5.0, &future_date())),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/coupons/{}", id),
        Some(json!({ "description": "new words" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "new words");
    assert_eq!(updated["code"], "EDIT");
    assert_eq!(updated["value"].as_f64().unwrap(), 5.0);

    let (status, body) = send(
        &app,
        "PUT",
        "/coupons/9999",
        Some(json!({ "description": "nobody home" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn delete_soft_deletes_and_stays_inactive() {
    let (_dir, app) = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/coupons",
        Some(coupon_body("GONE", 5.0, &future_date())),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, deleted) = send(&app, "DELETE", &format!("/coupons/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["status"], "inactive");

    // Second delete still succeeds; the row is retained
    let (status, deleted) = send(&app, "DELETE", &format!("/coupons/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["status"], "inactive");

    let (status, fetched) = send(&app, "GET", &format!("/coupons/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "inactive");
}
