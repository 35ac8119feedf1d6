pub mod health;
pub mod mercadopago_webhooks;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(mercadopago_webhooks::router())
        .merge(health::router())
}
