//! Error type for the HTTP layer.
//!
//! [`ServiceError`] wraps allocation failures from `ecash_id` and failures of
//! the blocking task running them, and maps each onto an HTTP status:
//!
//! - `StoreUnavailable` from a transient failure: `503 Service Unavailable`,
//!   retryable.
//! - `InvalidPeriod`: `400 Bad Request`.
//! - Exhausted or corrupt counters, `Clock` and task failures:
//!   `500 Internal Server Error`.
//!
//! A failed allocation never falls back to a locally made-up identifier; the
//! caller must not create the request record.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Allocation(#[from] ecash_id::Error),

    /// The blocking allocation task panicked or was cancelled.
    #[error("allocation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Allocation(e @ ecash_id::Error::StoreUnavailable(_)) if e.is_retryable() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Allocation(ecash_id::Error::InvalidPeriod { .. }) => StatusCode::BAD_REQUEST,
            Self::Allocation(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Allocation(e) if e.is_retryable())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    retryable: bool,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }

        let body = ErrorBody {
            error: self.to_string(),
            retryable: self.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use ecash_id::{Period, StoreError};

    use super::*;

    fn allocation(err: StoreError) -> ServiceError {
        ServiceError::Allocation(err.into())
    }

    #[test]
    fn transient_store_failures_are_503() {
        let err = allocation(StoreError::unavailable("database is locked"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.is_retryable());
    }

    #[test]
    fn permanent_store_failures_are_500() {
        let period = Period::new(2025, 3).unwrap();
        for err in [
            allocation(StoreError::Exhausted { period }),
            allocation(StoreError::Corrupt { period, value: 0 }),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn invalid_periods_are_400() {
        let err = ServiceError::Allocation(ecash_id::Error::InvalidPeriod { year: 2025, month: 13 });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!err.is_retryable());
    }
}
