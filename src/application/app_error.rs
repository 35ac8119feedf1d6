use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Payment processor fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Malformed notification: {0}")]
    MalformedEnvelope(String),

    #[error("Invalid external reference: {0}")]
    InvalidReference(String),

    #[error("Invalid boost level: {0}")]
    InvalidBoostLevel(String),

    #[error("Invalid plan type: {0}")]
    InvalidPlanType(String),

    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    UpstreamFetchFailed,
    MalformedEnvelope,
    InvalidReference,
    InvalidBoostLevel,
    InvalidPlanType,
    NotificationFailed,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::UpstreamFetchFailed => "UPSTREAM_FETCH_FAILED",
            ErrorCode::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorCode::InvalidReference => "INVALID_REFERENCE",
            ErrorCode::InvalidBoostLevel => "INVALID_BOOST_LEVEL",
            ErrorCode::InvalidPlanType => "INVALID_PLAN_TYPE",
            ErrorCode::NotificationFailed => "NOTIFICATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
