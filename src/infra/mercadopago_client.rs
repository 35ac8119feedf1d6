use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_processor::{
        PaymentProcessorTrait, PaymentRecord, SubscriptionRecord,
    },
    domain::entities::{payment_status::PaymentStatus, subscription_status::SubscriptionStatus},
    infra::http_client::try_build_client_with_timeout,
};

pub const MERCADOPAGO_API_BASE: &str = "https://api.mercadopago.com";

/// Read-only Mercado Pago client. Only the fields the reconciliation needs
/// are decoded; everything else in the response is ignored.
#[derive(Clone)]
pub struct MercadoPagoClient {
    client: Client,
    api_base: Url,
    access_token: SecretString,
}

impl MercadoPagoClient {
    /// `request_timeout` bounds each attempt; the retry policy bounds how
    /// many attempts one webhook makes.
    pub fn new(
        api_base: Url,
        access_token: SecretString,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: try_build_client_with_timeout(request_timeout)?,
            api_base,
            access_token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Mercado Pago base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Mercado Pago request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::UpstreamFetch(format!("Failed to read Mercado Pago response: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Mercado Pago API error");
            return Err(AppError::UpstreamFetch(format!(
                "Mercado Pago API error: {}",
                status
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse Mercado Pago response");
            AppError::UpstreamFetch(format!("Failed to parse Mercado Pago response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProcessorTrait for MercadoPagoClient {
    async fn get_payment(&self, payment_id: &str) -> AppResult<PaymentRecord> {
        let url = self.endpoint(&["v1", "payments", payment_id])?;
        let payment: MercadoPagoPayment = self.get_json(url).await?;

        Ok(PaymentRecord {
            id: payment_id.to_string(),
            status: PaymentStatus::from_mercadopago(&payment.status),
            external_reference: payment.external_reference,
        })
    }

    async fn get_subscription(&self, subscription_id: &str) -> AppResult<SubscriptionRecord> {
        let url = self.endpoint(&["v1", "preapproval", subscription_id])?;
        let preapproval: MercadoPagoPreapproval = self.get_json(url).await?;

        Ok(SubscriptionRecord {
            id: subscription_id.to_string(),
            status: SubscriptionStatus::from_mercadopago(&preapproval.status),
            external_reference: preapproval.external_reference,
        })
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MercadoPagoPayment {
    pub status: String,
    pub external_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MercadoPagoPreapproval {
    pub status: String,
    pub external_reference: Option<String>,
}
