use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, None)
            }
            AppError::UpstreamFetch(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UpstreamFetchFailed,
                None,
            ),
            AppError::MalformedEnvelope(msg) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::MalformedEnvelope,
                Some(msg),
            ),
            AppError::InvalidReference(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidReference, Some(msg))
            }
            AppError::InvalidBoostLevel(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidBoostLevel, Some(msg))
            }
            AppError::InvalidPlanType(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidPlanType, Some(msg))
            }
            AppError::NotificationDelivery(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::NotificationFailed,
                None,
            ),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, None),
            AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
