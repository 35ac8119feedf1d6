use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::app_error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    /// Push data payloads only carry string values.
    pub data: BTreeMap<String, String>,
}

#[async_trait]
pub trait PushNotifierTrait: Send + Sync {
    async fn send(&self, token: &str, notification: &PushNotification) -> AppResult<()>;
}
