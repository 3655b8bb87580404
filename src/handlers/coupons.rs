use axum::extract::State;
use axum::http::StatusCode;

use crate::db::{DbPool, queries};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Coupon, CouponFilter, CreateCoupon, UpdateCoupon};

/// POST /coupons
pub async fn create_coupon(
    State(pool): State<DbPool>,
    Json(body): Json<CreateCoupon>,
) -> Result<(StatusCode, Json<Coupon>)> {
    let conn = pool.get()?;
    let coupon = queries::create_coupon(&conn, &body)?;

    tracing::info!("Created coupon {} (id: {})", coupon.code, coupon.id);

    Ok((StatusCode::CREATED, Json(coupon)))
}

/// GET /coupons?status&minValue&maxValue&expiresBefore
pub async fn list_coupons(
    State(pool): State<DbPool>,
    Query(filter): Query<CouponFilter>,
) -> Result<Json<Vec<Coupon>>> {
    let conn = pool.get()?;
    let coupons = queries::list_coupons(&conn, &filter)?;
    Ok(Json(coupons))
}

/// GET /coupons/{id}
pub async fn get_coupon(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Coupon>> {
    let conn = pool.get()?;
    let coupon = queries::get_coupon_by_id(&conn, id)?
        .ok_or_else(|| AppError::NotFound("Coupon not found".into()))?;
    Ok(Json(coupon))
}

/// PUT /coupons/{id}
pub async fn update_coupon(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCoupon>,
) -> Result<Json<Coupon>> {
    let conn = pool.get()?;
    let coupon = queries::update_coupon(&conn, id, &body)?;

    tracing::info!("Updated coupon {} (id: {})", coupon.code, coupon.id);

    Ok(Json(coupon))
}

/// DELETE /coupons/{id} — soft delete, status flips to inactive
pub async fn delete_coupon(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<Coupon>> {
    let conn = pool.get()?;
    let coupon = queries::soft_delete_coupon(&conn, id)?;

    tracing::info!("Soft-deleted coupon {} (id: {})", coupon.code, coupon.id);

    Ok(Json(coupon))
}
