use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::ports::record_store::{GuardedWrite, UserRepoTrait},
    domain::entities::{
        plan::UserPlan,
        user::{PlanActivation, User},
    },
};

const SELECT_COLS: &str = r#"
    id, plan, proposals_sent_this_month, plan_reset_date,
    subscription_id, subscription_expires_at, push_token
"#;

fn row_to_user(row: &sqlx::postgres::PgRow) -> AppResult<User> {
    let plan: String = row.get("plan");
    let plan: UserPlan = plan.parse().map_err(AppError::Internal)?;

    Ok(User {
        id: row.get("id"),
        plan,
        proposals_sent_this_month: row.get("proposals_sent_this_month"),
        plan_reset_date: row.get("plan_reset_date"),
        subscription_id: row.get("subscription_id"),
        subscription_expires_at: row.get("subscription_expires_at"),
        push_token: row.get("push_token"),
    })
}

impl PostgresPersistence {
    async fn user_exists(&self, user_id: &str) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)
    }

    async fn guarded_outcome(&self, rows_affected: u64, user_id: &str) -> AppResult<GuardedWrite> {
        if rows_affected > 0 {
            Ok(GuardedWrite::Applied)
        } else if self.user_exists(user_id).await? {
            Ok(GuardedWrite::Skipped)
        } else {
            Ok(GuardedWrite::Missing)
        }
    }
}

#[async_trait]
impl UserRepoTrait for PostgresPersistence {
    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", SELECT_COLS))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(AppError::from)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn activate_plan(
        &self,
        user_id: &str,
        activation: &PlanActivation,
    ) -> AppResult<GuardedWrite> {
        // SET expressions read the pre-update row, so the CASEs compare against
        // the previous plan.
        let result = sqlx::query(
            r#"UPDATE users
               SET proposals_sent_this_month =
                       CASE WHEN plan IS DISTINCT FROM $2 THEN 0 ELSE proposals_sent_this_month END,
                   plan_reset_date =
                       CASE WHEN plan IS DISTINCT FROM $2 THEN $3 ELSE plan_reset_date END,
                   plan = $2,
                   subscription_id = $4,
                   subscription_expires_at = $5,
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
                 AND NOT (plan = $2 AND subscription_id IS NOT DISTINCT FROM $4)"#,
        )
        .bind(user_id)
        .bind(activation.plan_type.as_str())
        .bind(activation.activated_at)
        .bind(&activation.subscription_id)
        .bind(activation.expires_at)
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        self.guarded_outcome(result.rows_affected(), user_id).await
    }

    async fn downgrade_to_free(&self, user_id: &str) -> AppResult<GuardedWrite> {
        let result = sqlx::query(
            r#"UPDATE users
               SET plan = 'free',
                   subscription_id = NULL,
                   subscription_expires_at = NULL,
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
                 AND (plan <> 'free'
                      OR subscription_id IS NOT NULL
                      OR subscription_expires_at IS NOT NULL)"#,
        )
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(AppError::from)?;

        self.guarded_outcome(result.rows_affected(), user_id).await
    }
}
