//! Row-mapping helpers shared by the query layer.
//!
//! Each entity gets a column-list constant so SELECT statements and the
//! matching `FromRow` impl can never drift apart silently.

use chrono::DateTime;
use rusqlite::{Connection, Params, Row};

use crate::error::Result;
use crate::models::{Coupon, Redemption, RedemptionWithCoupon};

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub const COUPON_COLS: &str =
    "id, code, description, value, expiration_date, status, created_at, updated_at";

pub const REDEMPTION_COLS: &str = "id, coupon_id, user, status, created_at";

/// Redemption joined with its coupon (aliases r = redemptions, c = coupons).
pub const REDEMPTION_WITH_COUPON_COLS: &str =
    "r.id, r.coupon_id, r.user, r.status, r.created_at, \
     c.id, c.code, c.description, c.value, c.expiration_date, c.status, c.created_at, c.updated_at";

fn coupon_from_row_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Coupon> {
    let expiration_secs: i64 = row.get(base + 4)?;
    Ok(Coupon {
        id: row.get(base)?,
        code: row.get(base + 1)?,
        description: row.get(base + 2)?,
        value: row.get(base + 3)?,
        expiration_date: DateTime::from_timestamp(expiration_secs, 0).unwrap_or_default(),
        status: row.get::<_, String>(base + 5)?.parse().unwrap(),
        created_at: row.get(base + 6)?,
        updated_at: row.get(base + 7)?,
    })
}

impl FromRow for Coupon {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        coupon_from_row_at(row, 0)
    }
}

impl FromRow for Redemption {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Redemption {
            id: row.get(0)?,
            coupon_id: row.get(1)?,
            user: row.get(2)?,
            status: row.get::<_, String>(3)?.parse().unwrap(),
            created_at: row.get(4)?,
        })
    }
}

impl FromRow for RedemptionWithCoupon {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RedemptionWithCoupon {
            redemption: Redemption::from_row(row)?,
            coupon: coupon_from_row_at(row, 5)?,
        })
    }
}

pub fn query_one<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, |row| T::from_row(row))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
