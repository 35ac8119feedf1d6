use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    application::ports::push_notifier::{PushNotification, PushNotifierTrait},
};

/// Notifier used when no push provider is configured.
///
/// Every notification is written to the log and reported as delivered, so
/// local and staging deployments run the full reconciliation path without
/// FCM credentials.
#[derive(Clone, Default)]
pub struct LogOnlyPushNotifier;

impl LogOnlyPushNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushNotifierTrait for LogOnlyPushNotifier {
    async fn send(&self, _token: &str, notification: &PushNotification) -> AppResult<()> {
        tracing::info!(
            title = %notification.title,
            body = %notification.body,
            data = ?notification.data,
            "Push notification (log only)"
        );
        Ok(())
    }
}
