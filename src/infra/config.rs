use std::net::SocketAddr;
use std::time::Duration;

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::{application::retry::RetryPolicy, infra::mercadopago_client::MERCADOPAGO_API_BASE};

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub mercadopago_access_token: SecretString,
    pub mercadopago_api_base: Url,
    /// Attempts per processor fetch, including the first one.
    pub processor_fetch_max_attempts: u32,
    pub processor_fetch_retry_base: Duration,
    /// Total time allowed for a single processor request.
    pub processor_fetch_timeout: Duration,
    /// Path to the Google service-account JSON key used for FCM. `None`
    /// falls back to the log-only notifier.
    pub fcm_service_account_file: Option<String>,
    /// JSON log sink.
    pub log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let database_max_connections: u32 = get_env_default("DATABASE_MAX_CONNECTIONS", 5);

        let mercadopago_access_token =
            SecretString::new(get_env::<String>("MERCADOPAGO_ACCESS_TOKEN").into());
        let mercadopago_api_base: Url =
            get_env_default("MERCADOPAGO_API_BASE", MERCADOPAGO_API_BASE.parse().unwrap());

        let processor_fetch_max_attempts: u32 = get_env_default("PROCESSOR_FETCH_MAX_ATTEMPTS", 3);
        let processor_fetch_retry_base_ms: u64 = get_env_default("PROCESSOR_FETCH_RETRY_BASE_MS", 200);
        let processor_fetch_timeout_ms: u64 = get_env_default("PROCESSOR_FETCH_TIMEOUT_MS", 5000);

        let fcm_service_account_file = std::env::var("FCM_SERVICE_ACCOUNT_FILE")
            .ok()
            .filter(|s| !s.is_empty());

        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Self {
            bind_addr,
            database_url,
            database_max_connections,
            mercadopago_access_token,
            mercadopago_api_base,
            processor_fetch_max_attempts,
            processor_fetch_retry_base: Duration::from_millis(processor_fetch_retry_base_ms),
            processor_fetch_timeout: Duration::from_millis(processor_fetch_timeout_ms),
            fcm_service_account_file,
            log_file,
        }
    }

    pub fn processor_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.processor_fetch_max_attempts,
            self.processor_fetch_retry_base,
        )
    }
}
