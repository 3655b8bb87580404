mod coupons;
mod redemptions;

pub use coupons::*;
pub use redemptions::*;

use axum::{Json, Router, routing::get, routing::post};
use serde::Serialize;

use crate::db::DbPool;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<DbPool> {
    Router::new()
        .route("/health", get(health))
        .route("/coupons", post(create_coupon).get(list_coupons))
        .route(
            "/coupons/{id}",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route("/redeem", post(redeem_coupon))
        .route("/redemptions", get(list_redemptions))
        .route("/redemptions/{id}", get(get_redemption))
}
