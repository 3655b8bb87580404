mod coupon;
mod redemption;

pub use coupon::*;
pub use redemption::*;
