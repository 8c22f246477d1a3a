//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leasehold_shared::AppError;
use tracing::error;

/// Handler error rendered as `{ "error": CODE, "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (status, Json(self.0.body())).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use leasehold_core::billing::BillingError;
    use leasehold_shared::types::UnitId;
    use rstest::rstest;

    #[rstest]
    #[case(BillingError::Validation("dueDate is required".into()), StatusCode::BAD_REQUEST)]
    #[case(BillingError::NoActiveLease(UnitId::new()), StatusCode::NOT_FOUND)]
    #[case(BillingError::Persistence("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_billing_error_status(#[case] err: BillingError, #[case] status: StatusCode) {
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), status);
    }
}
