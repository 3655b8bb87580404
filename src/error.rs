use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input; caller must correct before retrying
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (duplicate coupon code)
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Business-rule rejection: the coupon was already redeemed
    #[error("{0}")]
    AlreadyRedeemed(String),

    /// Business-rule rejection: the coupon is inactive or manually expired
    #[error("{0}")]
    NotActive(String),

    /// Business-rule rejection: the expiration instant has passed
    #[error("{0}")]
    Expired(String),

    /// Transient storage failure; safe to retry
    #[error("Database is busy, try again")]
    Busy,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyRedeemed(_) => StatusCode::CONFLICT,
            AppError::NotActive(_) => StatusCode::BAD_REQUEST,
            AppError::Expired(_) => StatusCode::BAD_REQUEST,
            AppError::Busy => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::AlreadyRedeemed(_) => "already_redeemed",
            AppError::NotActive(_) => "not_active",
            AppError::Expired(_) => "expired",
            AppError::Busy => "busy",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Never leak internal details to clients
        let message = if let AppError::Internal(ref detail) = self {
            tracing::error!("Internal error: {}", detail);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                AppError::Busy
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Internal(format!("Connection pool error: {}", err))
    }
}
