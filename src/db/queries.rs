use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, TransactionBehavior, params, types::Value};

use crate::error::{AppError, Result};
use crate::models::*;
use crate::util::parse_instant;

use super::from_row::{
    COUPON_COLS, REDEMPTION_WITH_COUPON_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    id: i64,
    fields: Vec<(&'static str, Value)>,
    track_updated_at: bool,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: i64) -> Self {
        Self {
            table,
            id,
            fields: Vec::new(),
            track_updated_at: false,
        }
    }

    fn with_updated_at(mut self) -> Self {
        self.track_updated_at = true;
        self
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    fn execute(mut self, conn: &Connection) -> Result<bool> {
        if self.fields.is_empty() {
            return Ok(false);
        }
        if self.track_updated_at {
            self.fields.push(("updated_at", now().into()));
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, sets.join(", "));
        let affected = match conn.execute(&sql, rusqlite::params_from_iter(values)) {
            Ok(n) => n,
            Err(rusqlite::Error::SqliteFailure(e, msg))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                return Err(AppError::Conflict(
                    msg.unwrap_or_else(|| "Uniqueness constraint violated".into()),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(affected > 0)
    }
}

// ============ Coupons ============

/// Create a coupon. Field validation happens here so every caller (HTTP or
/// test harness) gets the same rules.
pub fn create_coupon(conn: &Connection, input: &CreateCoupon) -> Result<Coupon> {
    if input.code.trim().is_empty() {
        return Err(AppError::Validation("code must not be empty".into()));
    }
    if input.description.trim().is_empty() {
        return Err(AppError::Validation("description must not be empty".into()));
    }
    if input.value < 0.0 {
        return Err(AppError::Validation("value must be non-negative".into()));
    }
    let expires_at = parse_instant("expirationDate", &input.expiration_date)?.timestamp();
    let status = input.status.unwrap_or(CouponStatus::Active);
    let now = now();

    let result = conn.execute(
        "INSERT INTO coupons (code, description, value, expiration_date, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            &input.code,
            &input.description,
            input.value,
            expires_at,
            status.as_ref(),
            now,
            now
        ],
    );
    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            return Err(AppError::Conflict(format!(
                "Coupon code '{}' already exists",
                input.code
            )));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Coupon {
        id: conn.last_insert_rowid(),
        code: input.code.clone(),
        description: input.description.clone(),
        value: input.value,
        expiration_date: DateTime::from_timestamp(expires_at, 0).unwrap_or_default(),
        status,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_coupon_by_id(conn: &Connection, id: i64) -> Result<Option<Coupon>> {
    query_one(
        conn,
        &format!("SELECT {} FROM coupons WHERE id = ?1", COUPON_COLS),
        params![id],
    )
}

pub fn get_coupon_by_code(conn: &Connection, code: &str) -> Result<Option<Coupon>> {
    query_one(
        conn,
        &format!("SELECT {} FROM coupons WHERE code = ?1", COUPON_COLS),
        params![code],
    )
}

/// List coupons matching every supplied predicate, newest first.
pub fn list_coupons(conn: &Connection, filter: &CouponFilter) -> Result<Vec<Coupon>> {
    let mut where_clause = String::from("WHERE 1=1");
    let mut filter_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(status) = filter.status {
        where_clause.push_str(" AND status = ?");
        filter_params.push(Box::new(status.as_ref().to_string()));
    }
    if let Some(min_value) = filter.min_value {
        where_clause.push_str(" AND value >= ?");
        filter_params.push(Box::new(min_value));
    }
    if let Some(max_value) = filter.max_value {
        where_clause.push_str(" AND value <= ?");
        filter_params.push(Box::new(max_value));
    }
    if let Some(ref raw) = filter.expires_before {
        let instant = parse_instant("expiresBefore", raw)?;
        where_clause.push_str(" AND expiration_date <= ?");
        filter_params.push(Box::new(instant.timestamp()));
    }

    let sql = format!(
        "SELECT {} FROM coupons {} ORDER BY id DESC",
        COUPON_COLS, where_clause
    );
    let filter_refs: Vec<&dyn rusqlite::ToSql> =
        filter_params.iter().map(|b| b.as_ref()).collect();
    query_all(conn, &sql, filter_refs.as_slice())
}

/// Apply only the supplied fields; absent fields stay untouched.
pub fn update_coupon(conn: &Connection, id: i64, input: &UpdateCoupon) -> Result<Coupon> {
    // Existence check up front so an empty update still 404s correctly
    get_coupon_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound("Coupon not found".into()))?;

    if let Some(value) = input.value
        && value < 0.0
    {
        return Err(AppError::Validation("value must be non-negative".into()));
    }
    let expires_at = input
        .expiration_date
        .as_deref()
        .map(|raw| parse_instant("expirationDate", raw))
        .transpose()?
        .map(|dt| dt.timestamp());

    UpdateBuilder::new("coupons", id)
        .with_updated_at()
        .set_opt("code", input.code.clone())
        .set_opt("description", input.description.clone())
        .set_opt("value", input.value)
        .set_opt("expiration_date", expires_at)
        .set_opt("status", input.status.map(|s| s.as_ref().to_string()))
        .execute(conn)?;

    get_coupon_by_id(conn, id)?
        .ok_or_else(|| AppError::Internal("Coupon vanished during update".into()))
}

/// Soft delete: set status to inactive, keep the row. Calling it again on an
/// already-inactive coupon succeeds and leaves it inactive.
pub fn soft_delete_coupon(conn: &Connection, id: i64) -> Result<Coupon> {
    let affected = conn.execute(
        "UPDATE coupons SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![CouponStatus::Inactive.as_ref(), now(), id],
    )?;
    if affected == 0 {
        return Err(AppError::NotFound("Coupon not found".into()));
    }
    get_coupon_by_id(conn, id)?
        .ok_or_else(|| AppError::Internal("Coupon vanished during delete".into()))
}

// ============ Redemptions ============

pub fn list_redemptions(conn: &Connection) -> Result<Vec<RedemptionWithCoupon>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM redemptions r JOIN coupons c ON c.id = r.coupon_id ORDER BY r.id DESC",
            REDEMPTION_WITH_COUPON_COLS
        ),
        [],
    )
}

pub fn get_redemption_by_id(conn: &Connection, id: i64) -> Result<Option<RedemptionWithCoupon>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM redemptions r JOIN coupons c ON c.id = r.coupon_id WHERE r.id = ?1",
            REDEMPTION_WITH_COUPON_COLS
        ),
        params![id],
    )
}

/// Redeem a coupon by code: eligibility checks plus the atomic phase.
///
/// Eligibility order matters for the error the caller sees: `redeemed`
/// before the generic not-active check, expiration last.
///
/// The whole workflow runs inside one IMMEDIATE transaction, so the write
/// lock is held before the coupon row is read and the status seen here is
/// authoritative. The flip to `redeemed` is still a conditional update
/// keyed on `status = 'active'`; zero rows affected means another redeemer
/// committed between our read and write, which we surface as
/// `AlreadyRedeemed`. The redemption insert and the status flip commit
/// together or not at all.
pub fn redeem_coupon(
    conn: &mut Connection,
    code: &str,
    user: Option<&str>,
) -> Result<RedemptionWithCoupon> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let coupon: Coupon = query_one(
        &tx,
        &format!("SELECT {} FROM coupons WHERE code = ?1", COUPON_COLS),
        params![code],
    )?
    .ok_or_else(|| AppError::NotFound("Coupon not found".into()))?;

    match coupon.status {
        CouponStatus::Redeemed => {
            return Err(AppError::AlreadyRedeemed("Coupon already redeemed".into()));
        }
        CouponStatus::Inactive | CouponStatus::Expired => {
            return Err(AppError::NotActive("Coupon is not active".into()));
        }
        CouponStatus::Active => {}
    }

    let now = now();
    if coupon.expiration_date.timestamp() <= now {
        return Err(AppError::Expired("Coupon is expired".into()));
    }

    let affected = tx.execute(
        "UPDATE coupons SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        params![
            CouponStatus::Redeemed.as_ref(),
            now,
            coupon.id,
            CouponStatus::Active.as_ref()
        ],
    )?;
    if affected == 0 {
        return Err(AppError::AlreadyRedeemed("Coupon already redeemed".into()));
    }

    tx.execute(
        "INSERT INTO redemptions (coupon_id, user, status, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![coupon.id, user, RedemptionStatus::Success.as_ref(), now],
    )?;
    let redemption_id = tx.last_insert_rowid();

    tx.commit()?;

    Ok(RedemptionWithCoupon {
        redemption: Redemption {
            id: redemption_id,
            coupon_id: coupon.id,
            user: user.map(String::from),
            status: RedemptionStatus::Success,
            created_at: now,
        },
        coupon: Coupon {
            status: CouponStatus::Redeemed,
            updated_at: now,
            ..coupon
        },
    })
}
