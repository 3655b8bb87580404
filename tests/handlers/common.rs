use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use couponbox::{db, handlers};

/// App with a throwaway database. Keep the TempDir alive for the test.
pub fn test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let pool = db::init_pool(path.to_str().unwrap()).unwrap();
    (dir, handlers::router().with_state(pool))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn future_date() -> String {
    (Utc::now() + Duration::hours(1)).to_rfc3339()
}

pub fn past_date() -> String {
    (Utc::now() - Duration::hours(1)).to_rfc3339()
}

pub fn coupon_body(code: &str, value: f64, expiration_date: &str) -> Value {
    serde_json::json!({
        "code": code,
        "description": format!("{} test coupon", code),
        "value": value,
        "expirationDate": expiration_date,
    })
}
