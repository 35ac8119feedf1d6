use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::ports::record_store::{DemandRepoTrait, GuardedWrite},
    domain::entities::demand::BoostGrant,
};

#[async_trait]
impl DemandRepoTrait for PostgresPersistence {
    async fn apply_boost(&self, demand_id: &str, grant: &BoostGrant) -> AppResult<GuardedWrite> {
        // The WHERE clause is the idempotency guard; the row lock taken by
        // UPDATE makes check and write a single atomic step.
        let result = sqlx::query(
            r#"UPDATE demands
               SET boosted = TRUE,
                   boost_level = $2,
                   boost_purchased_at = $3,
                   boost_expires_at = $4,
                   boost_payment_id = $5,
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
                 AND boost_payment_id IS DISTINCT FROM $5"#,
        )
        .bind(demand_id)
        .bind(grant.level)
        .bind(grant.purchased_at)
        .bind(grant.expires_at)
        .bind(&grant.payment_id)
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() > 0 {
            return Ok(GuardedWrite::Applied);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM demands WHERE id = $1)")
            .bind(demand_id)
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(if exists {
            GuardedWrite::Skipped
        } else {
            GuardedWrite::Missing
        })
    }
}
