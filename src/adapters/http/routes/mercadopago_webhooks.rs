//! Mercado Pago notification webhook.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::{error, info, warn};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::inbound_event::{InboundEvent, WebhookEnvelope},
};

/// Determines if a processing error should make Mercado Pago redeliver.
///
/// Returns `true` if the error is transient, meaning we answer 5xx and let
/// the processor retry the notification.
///
/// Returns `false` if the error won't change with a retry (bad checkout
/// data, unknown record), meaning we answer 200 and log.
fn is_retryable_error(error: &AppError) -> bool {
    match error {
        // Transient errors - retry may succeed
        AppError::Database(_) => true,
        AppError::UpstreamFetch(_) => true,
        AppError::MalformedEnvelope(_) => true,
        AppError::Internal(_) => true,

        // Expected conditions - won't change with retry
        AppError::InvalidReference(_) => false,
        AppError::InvalidBoostLevel(_) => false,
        AppError::InvalidPlanType(_) => false,
        AppError::NotFound => false,
        AppError::NotificationDelivery(_) => false,
    }
}

/// Returns 500 Internal Server Error for Mercado Pago to redeliver.
/// Logs the error with the event that failed.
fn webhook_retryable_error(error: &AppError, event: &InboundEvent) -> StatusCode {
    error!(
        error = %error,
        event = ?event,
        retryable = true,
        "Webhook processing failed, returning 500 for redelivery"
    );
    StatusCode::INTERNAL_SERVER_ERROR
}

/// POST /webhooks/mercadopago
///
/// Answers 200 once the notification is handled or can never be handled,
/// and 500 when a redelivery could succeed. The body is taken as raw bytes so
/// that any undecodable payload, invalid UTF-8 included, reaches the
/// malformed-envelope path.
async fn handle_webhook(
    State(app_state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let envelope: WebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedEnvelope(format!("Invalid webhook payload: {}", e)))?;
    let event = InboundEvent::from_envelope(envelope).map_err(AppError::MalformedEnvelope)?;

    match app_state.reconciliation_use_cases.dispatch(&event).await {
        Ok(outcome) => {
            info!(event_type = %event.kind(), outcome = ?outcome, "Webhook processed");
            Ok((StatusCode::OK, "OK"))
        }
        Err(e) if is_retryable_error(&e) => Ok((webhook_retryable_error(&e, &event), "Retry")),
        Err(e) => {
            warn!(
                error = %e,
                event = ?event,
                retryable = false,
                "Webhook processing failed permanently, acknowledging"
            );
            Ok((StatusCode::OK, "OK"))
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/mercadopago", post(handle_webhook))
}
