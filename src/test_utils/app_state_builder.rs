//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates a minimal `AppState`
//! with in-memory mocks for testing HTTP endpoints.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::{
            payment_processor::PaymentProcessorTrait,
            push_notifier::PushNotifierTrait,
            record_store::{DemandRepoTrait, UserRepoTrait},
        },
        retry::RetryPolicy,
        use_cases::reconciliation::ReconciliationUseCases,
    },
    infra::config::AppConfig,
    test_utils::{InMemoryDemandRepo, InMemoryUserRepo, RecordingPushNotifier, StubPaymentProcessor},
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// Anything not supplied is empty: no demands, no users, a processor that
/// knows no records, and a notifier that records nothing useful. Processor
/// fetches are not retried unless `with_retry` says otherwise.
///
/// # Example
///
/// ```ignore
/// let demand_repo = Arc::new(InMemoryDemandRepo::with_demands(vec![create_test_demand(|_| {})]));
///
/// let app_state = TestAppStateBuilder::new()
///     .with_demand_repo(demand_repo.clone())
///     .with_processor(Arc::new(StubPaymentProcessor::new().with_payment(payment)))
///     .build();
/// ```
pub struct TestAppStateBuilder {
    processor: Option<Arc<dyn PaymentProcessorTrait>>,
    demand_repo: Option<Arc<dyn DemandRepoTrait>>,
    user_repo: Option<Arc<dyn UserRepoTrait>>,
    notifier: Option<Arc<dyn PushNotifierTrait>>,
    retry: RetryPolicy,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            processor: None,
            demand_repo: None,
            user_repo: None,
            notifier: None,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_processor(mut self, processor: Arc<dyn PaymentProcessorTrait>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn with_demand_repo(mut self, repo: Arc<dyn DemandRepoTrait>) -> Self {
        self.demand_repo = Some(repo);
        self
    }

    pub fn with_user_repo(mut self, repo: Arc<dyn UserRepoTrait>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn PushNotifierTrait>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build only the use cases, for tests below the HTTP layer.
    pub fn build_use_cases(self) -> ReconciliationUseCases {
        ReconciliationUseCases::new(
            self.processor
                .unwrap_or_else(|| Arc::new(StubPaymentProcessor::new())),
            self.demand_repo
                .unwrap_or_else(|| Arc::new(InMemoryDemandRepo::new())),
            self.user_repo
                .unwrap_or_else(|| Arc::new(InMemoryUserRepo::new())),
            self.notifier
                .unwrap_or_else(|| Arc::new(RecordingPushNotifier::new())),
            self.retry,
        )
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> AppState {
        // Create minimal config for testing
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://localhost/reconciler_test".to_string(),
            database_max_connections: 1,
            mercadopago_access_token: SecretString::new("TEST-access-token".into()),
            mercadopago_api_base: "http://127.0.0.1:9".parse().unwrap(),
            processor_fetch_max_attempts: self.retry.max_attempts(),
            processor_fetch_retry_base: Duration::ZERO,
            processor_fetch_timeout: Duration::from_secs(1),
            fcm_service_account_file: None,
            log_file: "test.log".to_string(),
        };

        AppState {
            config: Arc::new(config),
            reconciliation_use_cases: Arc::new(self.build_use_cases()),
        }
    }
}
