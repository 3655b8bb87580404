use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::Coupon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: i64,
    pub coupon_id: i64,
    /// Optional free-text identifier of the redeemer
    pub user: Option<String>,
    pub status: RedemptionStatus,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionWithCoupon {
    #[serde(flatten)]
    pub redemption: Redemption,
    pub coupon: Coupon,
}
