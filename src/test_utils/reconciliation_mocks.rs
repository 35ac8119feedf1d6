//! In-memory implementations of the reconciliation ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        payment_processor::{PaymentProcessorTrait, PaymentRecord, SubscriptionRecord},
        push_notifier::{PushNotification, PushNotifierTrait},
        record_store::{DemandRepoTrait, GuardedWrite, UserRepoTrait},
    },
    domain::entities::{
        demand::{BoostGrant, Demand},
        user::{PlanActivation, User},
    },
};

// ============================================================================
// InMemoryDemandRepo
// ============================================================================

/// Check and write happen under one lock, like the conditional UPDATE.
#[derive(Default)]
pub struct InMemoryDemandRepo {
    pub demands: Mutex<HashMap<String, Demand>>,
    unavailable: AtomicBool,
}

impl InMemoryDemandRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demands(demands: Vec<Demand>) -> Self {
        let map: HashMap<String, Demand> =
            demands.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            demands: Mutex::new(map),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn get(&self, id: &str) -> Option<Demand> {
        self.demands.lock().unwrap().get(id).cloned()
    }

    /// Make every call fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database("demand store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DemandRepoTrait for InMemoryDemandRepo {
    async fn apply_boost(&self, demand_id: &str, grant: &BoostGrant) -> AppResult<GuardedWrite> {
        self.check_available()?;
        let mut demands = self.demands.lock().unwrap();
        let Some(demand) = demands.get_mut(demand_id) else {
            return Ok(GuardedWrite::Missing);
        };
        Ok(if demand.apply_boost(grant) {
            GuardedWrite::Applied
        } else {
            GuardedWrite::Skipped
        })
    }
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<String, User>>,
    unavailable: AtomicBool,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<String, User> = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            users: Mutex::new(map),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    /// Make every call fail with a database error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Database("user store unavailable".into()));
        }
        Ok(())
    }

    fn update(&self, user_id: &str, change: impl FnOnce(&mut User) -> bool) -> GuardedWrite {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(user_id) {
            None => GuardedWrite::Missing,
            Some(user) => {
                if change(user) {
                    GuardedWrite::Applied
                } else {
                    GuardedWrite::Skipped
                }
            }
        }
    }
}

#[async_trait]
impl UserRepoTrait for InMemoryUserRepo {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.check_available()?;
        Ok(self.get(id))
    }

    async fn activate_plan(
        &self,
        user_id: &str,
        activation: &PlanActivation,
    ) -> AppResult<GuardedWrite> {
        self.check_available()?;
        Ok(self.update(user_id, |u| u.activate(activation)))
    }

    async fn downgrade_to_free(&self, user_id: &str) -> AppResult<GuardedWrite> {
        self.check_available()?;
        Ok(self.update(user_id, User::downgrade_to_free))
    }
}

// ============================================================================
// StubPaymentProcessor
// ============================================================================

/// Serves scripted records. Unknown ids fail like a processor 404.
#[derive(Default)]
pub struct StubPaymentProcessor {
    payments: Mutex<HashMap<String, PaymentRecord>>,
    subscriptions: Mutex<HashMap<String, SubscriptionRecord>>,
    failures_remaining: AtomicU32,
    calls: AtomicU32,
}

impl StubPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(self, payment: PaymentRecord) -> Self {
        self.set_payment(payment);
        self
    }

    pub fn with_subscription(self, subscription: SubscriptionRecord) -> Self {
        self.set_subscription(subscription);
        self
    }

    /// Fail the next `times` fetches with a transient error.
    pub fn failing_times(self, times: u32) -> Self {
        self.failures_remaining.store(times, Ordering::SeqCst);
        self
    }

    pub fn set_payment(&self, payment: PaymentRecord) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }

    pub fn set_subscription(&self, subscription: SubscriptionRecord) {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(subscription.id.clone(), subscription);
    }

    /// Number of fetches made, including failed ones.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::UpstreamFetch("simulated processor outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProcessorTrait for StubPaymentProcessor {
    async fn get_payment(&self, payment_id: &str) -> AppResult<PaymentRecord> {
        self.record_call()?;
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| AppError::UpstreamFetch(format!("payment {} not found", payment_id)))
    }

    async fn get_subscription(&self, subscription_id: &str) -> AppResult<SubscriptionRecord> {
        self.record_call()?;
        self.subscriptions
            .lock()
            .unwrap()
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| {
                AppError::UpstreamFetch(format!("subscription {} not found", subscription_id))
            })
    }
}

// ============================================================================
// RecordingPushNotifier
// ============================================================================

#[derive(Default)]
pub struct RecordingPushNotifier {
    pub sent: Mutex<Vec<(String, PushNotification)>>,
    fail: bool,
}

impl RecordingPushNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records nothing and rejects every send.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, PushNotification)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushNotifierTrait for RecordingPushNotifier {
    async fn send(&self, token: &str, notification: &PushNotification) -> AppResult<()> {
        if self.fail {
            return Err(AppError::NotificationDelivery("token unregistered".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), notification.clone()));
        Ok(())
    }
}
