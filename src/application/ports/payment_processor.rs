use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    domain::entities::{payment_status::PaymentStatus, subscription_status::SubscriptionStatus},
};

// ============================================================================
// Port Types - authoritative snapshots fetched from the processor
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: String,
    pub status: PaymentStatus,
    /// Returned exactly as supplied at checkout.
    pub external_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    pub id: String,
    pub status: SubscriptionStatus,
    pub external_reference: Option<String>,
}

// ============================================================================
// Port Trait
// ============================================================================

/// Read side of the payment processor.
///
/// Implementations must map transport failures, non-2xx responses and
/// undecodable bodies to `AppError::UpstreamFetch`, and must bound every call
/// with a timeout.
#[async_trait]
pub trait PaymentProcessorTrait: Send + Sync {
    async fn get_payment(&self, payment_id: &str) -> AppResult<PaymentRecord>;

    async fn get_subscription(&self, subscription_id: &str) -> AppResult<SubscriptionRecord>;
}
