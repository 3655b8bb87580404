use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::db::{DbPool, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::RedemptionWithCoupon;

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub message: String,
    pub redemption: RedemptionWithCoupon,
}

/// POST /redeem
pub async fn redeem_coupon(
    State(pool): State<DbPool>,
    Json(body): Json<RedeemRequest>,
) -> Result<(StatusCode, Json<RedeemResponse>)> {
    if body.code.trim().is_empty() {
        return Err(AppError::Validation("code must not be empty".into()));
    }

    let mut conn = pool.get()?;
    let redemption = queries::redeem_coupon(&mut conn, &body.code, body.user.as_deref())?;

    tracing::info!(
        "Coupon {} redeemed (redemption id: {})",
        body.code,
        redemption.redemption.id
    );

    Ok((
        StatusCode::CREATED,
        Json(RedeemResponse {
            message: "Coupon redeemed successfully".into(),
            redemption,
        }),
    ))
}

/// GET /redemptions
pub async fn list_redemptions(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<RedemptionWithCoupon>>> {
    let conn = pool.get()?;
    let redemptions = queries::list_redemptions(&conn)?;
    Ok(Json(redemptions))
}

/// GET /redemptions/{id}
pub async fn get_redemption(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<RedemptionWithCoupon>> {
    let conn = pool.get()?;
    let redemption = queries::get_redemption_by_id(&conn, id)?
        .ok_or_else(|| AppError::NotFound("Redemption not found".into()))?;
    Ok(Json(redemption))
}
