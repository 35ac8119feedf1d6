use chrono::{DateTime, Duration, Utc};

use super::plan::{PlanType, UserPlan};

/// Fixed subscription cadence. Not calendar-month aware.
pub const SUBSCRIPTION_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub plan: UserPlan,
    pub proposals_sent_this_month: i32,
    pub plan_reset_date: Option<DateTime<Utc>>,
    pub subscription_id: Option<String>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub push_token: Option<String>,
}

/// Plan activation requested by an authorized subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanActivation {
    pub subscription_id: String,
    pub plan_type: PlanType,
    pub activated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PlanActivation {
    pub fn new(
        subscription_id: impl Into<String>,
        plan_type: PlanType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            plan_type,
            activated_at: now,
            expires_at: now + Duration::days(SUBSCRIPTION_PERIOD_DAYS),
        }
    }
}

impl User {
    /// `plan == Free` iff no subscription id iff no subscription expiry.
    pub fn plan_invariant_holds(&self) -> bool {
        let free = self.plan.is_free();
        free == self.subscription_id.is_none() && free == self.subscription_expires_at.is_none()
    }

    pub fn is_on(&self, activation: &PlanActivation) -> bool {
        self.plan == UserPlan::Paid(activation.plan_type)
            && self.subscription_id.as_deref() == Some(activation.subscription_id.as_str())
    }

    /// Returns whether anything changed. The monthly proposal counter is only
    /// reset when the plan type itself changes.
    pub fn activate(&mut self, activation: &PlanActivation) -> bool {
        if self.is_on(activation) {
            return false;
        }
        let new_plan = UserPlan::Paid(activation.plan_type);
        if self.plan != new_plan {
            self.proposals_sent_this_month = 0;
            self.plan_reset_date = Some(activation.activated_at);
        }
        self.plan = new_plan;
        self.subscription_id = Some(activation.subscription_id.clone());
        self.subscription_expires_at = Some(activation.expires_at);
        true
    }

    /// Returns whether anything changed. Leaves the proposal counter alone.
    pub fn downgrade_to_free(&mut self) -> bool {
        if self.plan.is_free()
            && self.subscription_id.is_none()
            && self.subscription_expires_at.is_none()
        {
            return false;
        }
        self.plan = UserPlan::Free;
        self.subscription_id = None;
        self.subscription_expires_at = None;
        true
    }
}
