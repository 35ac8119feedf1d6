use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    domain::entities::{
        demand::BoostGrant,
        user::{PlanActivation, User},
    },
};

/// Result of a guarded (compare-and-swap) write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedWrite {
    Applied,
    /// The stored marker already matched, nothing was written.
    Skipped,
    Missing,
}

#[async_trait]
pub trait DemandRepoTrait: Send + Sync {
    /// Writes `grant` in one conditional update unless `boost_payment_id`
    /// already equals `grant.payment_id`.
    async fn apply_boost(&self, demand_id: &str, grant: &BoostGrant) -> AppResult<GuardedWrite>;
}

#[async_trait]
pub trait UserRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Writes `activation` in one conditional update unless the user is
    /// already on the same plan with the same subscription id. Resets the
    /// monthly counters only when the plan type changes.
    async fn activate_plan(
        &self,
        user_id: &str,
        activation: &PlanActivation,
    ) -> AppResult<GuardedWrite>;

    /// Moves the user to the free plan unless they are already there.
    async fn downgrade_to_free(&self, user_id: &str) -> AppResult<GuardedWrite>;
}
