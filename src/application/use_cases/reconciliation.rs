use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::{
            payment_processor::PaymentProcessorTrait,
            push_notifier::{PushNotification, PushNotifierTrait},
            record_store::{DemandRepoTrait, GuardedWrite, UserRepoTrait},
        },
        push_templates::{boost_activated_push, plan_activated_push, plan_cancelled_push},
        retry::RetryPolicy,
    },
    domain::entities::{
        boost_level::BoostLevel,
        demand::BoostGrant,
        external_reference::{PaymentPurpose, PaymentReference, SubscriptionReference},
        inbound_event::InboundEvent,
        plan::PlanType,
        subscription_status::SubscriptionStatus,
        user::PlanActivation,
    },
};

/// What a notification ended up doing to domain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    BoostApplied {
        demand_id: String,
        payment_id: String,
    },
    /// Redelivery of a payment whose boost is already stored.
    BoostAlreadyApplied {
        demand_id: String,
        payment_id: String,
    },
    PlanActivated {
        user_id: String,
        plan_type: PlanType,
    },
    PlanDowngraded {
        user_id: String,
    },
    PlanUnchanged {
        user_id: String,
    },
    Ignored {
        reason: String,
    },
}

#[derive(Clone)]
pub struct ReconciliationUseCases {
    processor: Arc<dyn PaymentProcessorTrait>,
    demand_repo: Arc<dyn DemandRepoTrait>,
    user_repo: Arc<dyn UserRepoTrait>,
    notifier: Arc<dyn PushNotifierTrait>,
    retry: RetryPolicy,
}

impl ReconciliationUseCases {
    pub fn new(
        processor: Arc<dyn PaymentProcessorTrait>,
        demand_repo: Arc<dyn DemandRepoTrait>,
        user_repo: Arc<dyn UserRepoTrait>,
        notifier: Arc<dyn PushNotifierTrait>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            processor,
            demand_repo,
            user_repo,
            notifier,
            retry,
        }
    }

    #[instrument(skip(self))]
    pub async fn dispatch(&self, event: &InboundEvent) -> AppResult<ReconciliationOutcome> {
        match event {
            InboundEvent::Payment { payment_id } => self.handle_payment(payment_id).await,
            InboundEvent::SubscriptionChange { subscription_id } => {
                self.handle_subscription(subscription_id).await
            }
            InboundEvent::Unsupported { event_type } => {
                debug!(event_type = %event_type, "Unhandled notification type");
                Ok(ReconciliationOutcome::Ignored {
                    reason: format!("unhandled notification type {}", event_type),
                })
            }
        }
    }

    // ========================================================================
    // Payments (boosts)
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn handle_payment(&self, payment_id: &str) -> AppResult<ReconciliationOutcome> {
        let payment = self
            .retry
            .run("fetch payment", move || self.processor.get_payment(payment_id))
            .await?;

        // The processor notifies again on every status change.
        if !payment.status.is_approved() {
            debug!(payment_id, status = %payment.status, "Payment not approved, ignoring");
            return Ok(ReconciliationOutcome::Ignored {
                reason: format!("payment status {}", payment.status),
            });
        }

        let reference = PaymentReference::decode(payment.external_reference.as_deref())
            .map_err(AppError::InvalidReference)?;

        let (demand_id, raw_level) = match reference.purpose {
            PaymentPurpose::Boost {
                demand_id,
                boost_level,
            } => (demand_id, boost_level),
            PaymentPurpose::Other(purpose) => {
                debug!(payment_id, purpose = %purpose, "Approved payment is not a boost, ignoring");
                return Ok(ReconciliationOutcome::Ignored {
                    reason: format!("payment purpose {}", purpose),
                });
            }
        };

        let level: BoostLevel = raw_level.parse().map_err(AppError::InvalidBoostLevel)?;
        let grant = BoostGrant::new(payment_id, level, Utc::now());

        match self.demand_repo.apply_boost(&demand_id, &grant).await? {
            GuardedWrite::Applied => {
                info!(
                    payment_id,
                    demand_id = %demand_id,
                    boost_level = %level,
                    expires_at = %grant.expires_at,
                    "Boost applied"
                );
                self.notify_user(&reference.user_id, boost_activated_push(&demand_id))
                    .await;
                Ok(ReconciliationOutcome::BoostApplied {
                    demand_id,
                    payment_id: payment_id.to_string(),
                })
            }
            GuardedWrite::Skipped => {
                info!(payment_id, demand_id = %demand_id, "Boost already applied for payment, skipping");
                Ok(ReconciliationOutcome::BoostAlreadyApplied {
                    demand_id,
                    payment_id: payment_id.to_string(),
                })
            }
            GuardedWrite::Missing => Err(AppError::NotFound),
        }
    }

    // ========================================================================
    // Subscriptions (plans)
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn handle_subscription(
        &self,
        subscription_id: &str,
    ) -> AppResult<ReconciliationOutcome> {
        let subscription = self
            .retry
            .run("fetch subscription", move || {
                self.processor.get_subscription(subscription_id)
            })
            .await?;

        let reference = SubscriptionReference::decode(subscription.external_reference.as_deref())
            .map_err(AppError::InvalidReference)?;
        let user_id = reference.user_id;

        match subscription.status {
            SubscriptionStatus::Authorized => {
                let plan_type: PlanType = reference
                    .plan_type
                    .parse()
                    .map_err(AppError::InvalidPlanType)?;
                let activation = PlanActivation::new(subscription_id, plan_type, Utc::now());

                match self.user_repo.activate_plan(&user_id, &activation).await? {
                    GuardedWrite::Applied => {
                        info!(
                            subscription_id,
                            user_id = %user_id,
                            plan_type = %plan_type,
                            expires_at = %activation.expires_at,
                            "Plan activated"
                        );
                        self.notify_user(&user_id, plan_activated_push(plan_type))
                            .await;
                        Ok(ReconciliationOutcome::PlanActivated { user_id, plan_type })
                    }
                    GuardedWrite::Skipped => {
                        info!(subscription_id, user_id = %user_id, "Plan already active, skipping");
                        Ok(ReconciliationOutcome::PlanUnchanged { user_id })
                    }
                    GuardedWrite::Missing => Err(AppError::NotFound),
                }
            }
            SubscriptionStatus::Cancelled => {
                match self.user_repo.downgrade_to_free(&user_id).await? {
                    GuardedWrite::Applied => {
                        info!(subscription_id, user_id = %user_id, "Subscription cancelled, downgraded to free");
                        self.notify_user(&user_id, plan_cancelled_push()).await;
                        Ok(ReconciliationOutcome::PlanDowngraded { user_id })
                    }
                    GuardedWrite::Skipped => {
                        info!(subscription_id, user_id = %user_id, "User already on free plan, skipping");
                        Ok(ReconciliationOutcome::PlanUnchanged { user_id })
                    }
                    GuardedWrite::Missing => Err(AppError::NotFound),
                }
            }
            other => {
                debug!(subscription_id, status = %other, "Subscription status not handled, ignoring");
                Ok(ReconciliationOutcome::Ignored {
                    reason: format!("subscription status {}", other),
                })
            }
        }
    }

    // ========================================================================
    // Notification
    // ========================================================================

    /// Best-effort push. Never fails the caller; domain state is already
    /// written when this runs.
    async fn notify_user(&self, user_id: &str, notification: PushNotification) {
        let token = match self.user_repo.get_by_id(user_id).await {
            Ok(Some(user)) => user.push_token,
            Ok(None) => {
                debug!(user_id, "User not found, skipping push");
                return;
            }
            Err(e) => {
                warn!(error = %e, user_id, "Failed to load push token, skipping push");
                return;
            }
        };

        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!(user_id, "User has no push token, skipping push");
            return;
        };

        if let Err(e) = self.notifier.send(&token, &notification).await {
            warn!(error = %e, user_id, "Push notification failed");
        }
    }
}
