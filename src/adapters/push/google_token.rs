//! OAuth2 access tokens for Google APIs from a service-account key.
//!
//! FCM HTTP v1 only accepts short-lived bearer tokens (about an hour). The
//! provider signs an RS256 assertion with the service-account key, exchanges
//! it at the key's `token_uri` and caches the result until shortly before it
//! expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::app_error::{AppError, AppResult};

pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion. Google caps it at one hour.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Tokens closer than this to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account JSON key that the token exchange
/// needs.
#[derive(Debug)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key_id: Option<String>,
    pub private_key: SecretString,
    pub token_uri: Url,
}

#[derive(Deserialize)]
struct RawServiceAccountKey {
    project_id: String,
    client_email: String,
    private_key_id: Option<String>,
    private_key: String,
    token_uri: Url,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: RawServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| AppError::Internal(format!("Invalid service account key: {}", e)))?;
        Ok(Self {
            project_id: raw.project_id,
            client_email: raw.client_email,
            private_key_id: raw.private_key_id,
            private_key: SecretString::new(raw.private_key.into_boxed_str()),
            token_uri: raw.token_uri,
        })
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

pub struct GoogleTokenProvider {
    client: Client,
    client_email: String,
    key_id: Option<String>,
    token_uri: Url,
    scope: String,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleTokenProvider {
    pub fn new(client: Client, key: &ServiceAccountKey, scope: &str) -> AppResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid service account private key: {}", e)))?;

        Ok(Self {
            client,
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            scope: scope.to_string(),
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// Returns a token valid for at least the refresh margin, exchanging a
    /// new assertion when the cached one is missing or about to expire.
    pub async fn access_token(&self) -> AppResult<SecretString> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let fresh = self.exchange_assertion(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn exchange_assertion(&self, now: DateTime<Utc>) -> AppResult<CachedToken> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: self.token_uri.as_str(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        let assertion = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token assertion: {}", e)))?;

        let response: TokenResponse = self
            .client
            .post(self.token_uri.clone())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AppError::NotificationDelivery(format!("Token request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::NotificationDelivery(format!("Token request rejected: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::NotificationDelivery(format!("Invalid token response: {}", e)))?;

        tracing::debug!(expires_in = response.expires_in, "Obtained Google access token");

        Ok(CachedToken {
            token: SecretString::new(response.access_token.into_boxed_str()),
            expires_at: now + Duration::seconds(response.expires_in),
        })
    }
}
