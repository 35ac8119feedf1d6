use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use url::Url;

use crate::{
    adapters::push::google_token::{FCM_SCOPE, GoogleTokenProvider, ServiceAccountKey},
    app_error::{AppError, AppResult},
    application::ports::push_notifier::{PushNotification, PushNotifierTrait},
    infra::http_client::try_build_client,
};

pub const FCM_API_BASE: &str = "https://fcm.googleapis.com";

/// Firebase Cloud Messaging HTTP v1 sender.
///
/// Each send asks the token provider for a bearer token, which is reused
/// until it nears expiry.
#[derive(Clone)]
pub struct FcmPushNotifier {
    client: Client,
    send_url: Url,
    tokens: Arc<GoogleTokenProvider>,
}

impl FcmPushNotifier {
    pub fn new(key: &ServiceAccountKey) -> AppResult<Self> {
        let api_base = Url::parse(FCM_API_BASE)
            .map_err(|e| AppError::Internal(format!("Invalid FCM base URL: {}", e)))?;
        Self::with_api_base(api_base, key)
    }

    pub fn with_api_base(api_base: Url, key: &ServiceAccountKey) -> AppResult<Self> {
        let mut send_url = api_base;
        send_url
            .path_segments_mut()
            .map_err(|_| AppError::Internal("FCM base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(["v1", "projects", &key.project_id, "messages:send"]);

        let client = try_build_client()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        let tokens = GoogleTokenProvider::new(client.clone(), key, FCM_SCOPE)?;

        Ok(Self {
            client,
            send_url,
            tokens: Arc::new(tokens),
        })
    }
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[async_trait]
impl PushNotifierTrait for FcmPushNotifier {
    async fn send(&self, token: &str, notification: &PushNotification) -> AppResult<()> {
        let body = FcmRequest {
            message: FcmMessage {
                token,
                notification: FcmNotification {
                    title: &notification.title,
                    body: &notification.body,
                },
                data: &notification.data,
            },
        };

        let access_token = self.tokens.access_token().await?;

        self.client
            .post(self.send_url.clone())
            .bearer_auth(access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::NotificationDelivery(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::NotificationDelivery(e.to_string()))?;
        Ok(())
    }
}
