//! Shared utility functions for the couponbox application.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AppError, Result};

/// Parse an ISO-8601 string into a UTC instant.
///
/// Accepts full RFC 3339 timestamps ("2025-12-31T23:59:59Z") and bare
/// dates ("2025-12-31", read as midnight UTC). `field` names the offending
/// input in the validation message.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(dt.and_utc());
    }
    Err(AppError::Validation(format!(
        "Invalid {} value: '{}' is not an ISO-8601 date",
        field, raw
    )))
}
