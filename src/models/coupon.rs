use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Lifecycle status of a coupon.
///
/// `expired` is never assigned automatically; expiration is evaluated live
/// against `expiration_date` during redemption. The variant exists so an
/// operator can park a coupon there via update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    Active,
    Inactive,
    Redeemed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    /// Unique business key used for redemption lookup
    pub code: String,
    pub description: String,
    pub value: f64,
    /// Not redeemable at or after this instant
    pub expiration_date: DateTime<Utc>,
    pub status: CouponStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoupon {
    pub code: String,
    pub description: String,
    pub value: f64,
    /// ISO-8601; parsed before storage
    pub expiration_date: String,
    #[serde(default)]
    pub status: Option<CouponStatus>,
}

/// Partial update: absent field = leave unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoupon {
    pub code: Option<String>,
    pub description: Option<String>,
    pub value: Option<f64>,
    pub expiration_date: Option<String>,
    pub status: Option<CouponStatus>,
}

/// Listing filter; absent field = no constraint on that field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFilter {
    pub status: Option<CouponStatus>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    /// ISO-8601; coupons expiring at or before this instant
    pub expires_before: Option<String>,
}
