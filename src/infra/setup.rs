use crate::{
    adapters::{
        http::app_state::AppState,
        push::{
            fcm::FcmPushNotifier, google_token::ServiceAccountKey, log_only::LogOnlyPushNotifier,
        },
    },
    application::ports::{
        payment_processor::PaymentProcessorTrait,
        push_notifier::PushNotifierTrait,
        record_store::{DemandRepoTrait, UserRepoTrait},
    },
    infra::{config::AppConfig, mercadopago_client::MercadoPagoClient, postgres_persistence},
    use_cases::reconciliation::ReconciliationUseCases,
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres_arc = Arc::new(
        postgres_persistence(&config.database_url, config.database_max_connections).await?,
    );

    let processor = Arc::new(MercadoPagoClient::new(
        config.mercadopago_api_base.clone(),
        config.mercadopago_access_token.clone(),
        config.processor_fetch_timeout,
    )?);

    let notifier: Arc<dyn PushNotifierTrait> = match &config.fcm_service_account_file {
        Some(path) => {
            let key = load_service_account(path)?;
            tracing::info!(project_id = %key.project_id, "FCM push notifications enabled");
            Arc::new(
                FcmPushNotifier::new(&key)
                    .map_err(|e| anyhow::anyhow!("FCM notifier setup failed: {e}"))?,
            )
        }
        None => {
            tracing::warn!("FCM_SERVICE_ACCOUNT_FILE not set, push notifications are log-only");
            Arc::new(LogOnlyPushNotifier::new())
        }
    };

    let reconciliation_use_cases = ReconciliationUseCases::new(
        processor as Arc<dyn PaymentProcessorTrait>,
        postgres_arc.clone() as Arc<dyn DemandRepoTrait>,
        postgres_arc.clone() as Arc<dyn UserRepoTrait>,
        notifier,
        config.processor_retry_policy(),
    );

    Ok(AppState {
        config: Arc::new(config),
        reconciliation_use_cases: Arc::new(reconciliation_use_cases),
    })
}

fn load_service_account(path: &str) -> anyhow::Result<ServiceAccountKey> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read service account file {path}: {e}"))?;
    ServiceAccountKey::from_json(&json).map_err(|e| anyhow::anyhow!("{path}: {e}"))
}

pub fn init_tracing(log_file: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reconciler_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let file = File::create(log_file)
        .map_err(|e| anyhow::anyhow!("cannot create log file {log_file}: {e}"))?;
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
