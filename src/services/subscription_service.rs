use crate::entities::{PlanId, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{PrepareOrderResponse, UserResponse};
use crate::services::usage_service::apply_quota_defaults;
use crate::utils::generate_order_id;
use chrono::{DateTime, Duration, Months, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

/// Paid-term length for a plan, from the reconciliation instant.
fn period_end_for(plan: &PlanId, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let months = match plan {
        PlanId::Starter => return None,
        PlanId::Pro => 1,
        PlanId::Yearly => 12,
    };
    Some(
        now.checked_add_months(Months::new(months))
            .unwrap_or(now + Duration::days(30 * months as i64)),
    )
}

/// Plan selection and the order/payment reconciler.
///
/// Two actors write the same pending-order fields: the interactive upgrade
/// flow (`prepare_order`) and the payment provider's webhook (`reconcile`).
/// `prepare_order` overwrites unconditionally (last prepare wins);
/// `reconcile` applies the upgrade and clears the pending fields in one
/// statement keyed on the order id, so a replayed callback matches nothing.
#[derive(Clone)]
pub struct SubscriptionService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
}

impl SubscriptionService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// Immediate plan swap for the free tier. Paid plans go through
    /// `prepare_order` and the webhook instead.
    pub async fn select_plan(&self, user_id: i64, plan: PlanId) -> AppResult<UserResponse> {
        if plan != PlanId::Starter {
            return Err(AppError::ValidationError(format!(
                "{plan} requires payment; prepare an order first"
            )));
        }

        let defaults = plan.default_quotas();
        let result = apply_quota_defaults(users::Entity::update_many(), &defaults)
            .col_expr(users::Column::Plan, Expr::value(plan))
            .col_expr(
                users::Column::CurrentPeriodEnd,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .exec(&*self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(UserResponse::from(user))
    }

    /// Stage a paid upgrade: store an unpredictable order id and the
    /// requested plan on the user record for the payment widget to
    /// reference. Any prior pending order is overwritten.
    pub async fn prepare_order(
        &self,
        user_id: i64,
        plan: PlanId,
    ) -> AppResult<PrepareOrderResponse> {
        if plan == PlanId::Starter {
            return Err(AppError::ValidationError(
                "Starter does not require payment".to_string(),
            ));
        }

        let order_id = generate_order_id();
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::PendingOrderId,
                Expr::value(Some(order_id.clone())),
            )
            .col_expr(users::Column::PendingPlan, Expr::value(Some(plan.clone())))
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .exec(&*self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        log::info!("Prepared order {order_id} for user {user_id} -> {plan}");
        Ok(PrepareOrderResponse { order_id, plan })
    }

    /// Apply a payment event from the verified webhook path. Business-level
    /// misses (unknown order, non-final status) are logged no-ops; the
    /// webhook still acknowledges the provider.
    pub async fn reconcile(&self, order_id: &str, payment_status: &str) -> AppResult<()> {
        if payment_status != "finished" {
            log::info!("Payment status '{payment_status}' for order {order_id}; no action taken");
            return Ok(());
        }

        let user = users::Entity::find()
            .filter(users::Column::PendingOrderId.eq(order_id))
            .one(&*self.pool)
            .await?;

        let Some(user) = user else {
            log::warn!("No user with pending order {order_id}; ignoring callback");
            return Ok(());
        };

        let Some(plan) = user.pending_plan.clone() else {
            log::warn!(
                "User {} has order {order_id} but no pending plan; ignoring callback",
                user.id
            );
            return Ok(());
        };

        let now = Utc::now();
        let defaults = plan.default_quotas();

        // Plan swap, full quota reset, period end, and the pending-field
        // clear all land in one statement keyed on the order id. A second
        // "finished" callback for the same order finds no matching row.
        let result = apply_quota_defaults(users::Entity::update_many(), &defaults)
            .col_expr(users::Column::Plan, Expr::value(plan.clone()))
            .col_expr(
                users::Column::CurrentPeriodEnd,
                Expr::value(period_end_for(&plan, now)),
            )
            .col_expr(
                users::Column::PendingOrderId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                users::Column::PendingPlan,
                Expr::value(Option::<PlanId>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(users::Column::PendingOrderId.eq(order_id))
            .exec(&*self.pool)
            .await?;

        if result.rows_affected == 0 {
            log::warn!("Order {order_id} was reconciled concurrently; nothing to do");
        } else {
            log::info!("Activated {plan} for user {} via order {order_id}", user.id);
        }
        Ok(())
    }

    /// Downgrade accounts whose paid term has lapsed back to Starter, with
    /// a Starter quota reset. Returns the number of accounts downgraded.
    pub async fn expire_lapsed(&self) -> AppResult<u64> {
        let now = Utc::now();
        let defaults = PlanId::Starter.default_quotas();

        let result = apply_quota_defaults(users::Entity::update_many(), &defaults)
            .col_expr(users::Column::Plan, Expr::value(PlanId::Starter))
            .col_expr(
                users::Column::CurrentPeriodEnd,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(users::Column::Plan.ne(PlanId::Starter))
            .filter(users::Column::CurrentPeriodEnd.lt(now))
            .exec(&*self.pool)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn pending_pro_user(order_id: &str) -> users::Model {
        users::Model {
            id: 1,
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "x".into(),
            plan: PlanId::Starter,
            posts_used: 9,
            posts_total: 10,
            images_used: 0,
            images_total: 2,
            scripts_used: 0,
            scripts_total: 1,
            agents_used: 0,
            agents_total: 0,
            current_period_end: None,
            pending_order_id: Some(order_id.to_string()),
            pending_plan: Some(PlanId::Pro),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn reconcile_activates_pending_plan() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![pending_pro_user("ord_abc")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let svc = SubscriptionService::new(db.clone());
        svc.reconcile("ord_abc", "finished").await.unwrap();

        // The upgrade statement is keyed on the order id and clears it.
        drop(svc);
        let db = Arc::into_inner(db).expect("test holds the last reference");
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("pending_order_id"));
        assert!(sql.contains("current_period_end"));
    }

    #[tokio::test]
    async fn replayed_finished_callback_matches_nothing() {
        // The pending fields were already cleared by the first delivery,
        // so the keyed update affects zero rows and the replay is a no-op.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending_pro_user("ord_abc")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = SubscriptionService::new(db)
            .reconcile("ord_abc", "finished")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_order_is_an_acknowledged_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let result = SubscriptionService::new(db)
            .reconcile("ord_missing", "finished")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_final_status_never_touches_the_store() {
        // No query or exec results are queued; any store access would fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = SubscriptionService::new(db)
            .reconcile("ord_abc", "waiting")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn starter_has_no_period_end() {
        assert!(period_end_for(&PlanId::Starter, Utc::now()).is_none());
    }

    #[test]
    fn pro_period_is_about_one_month() {
        let now = Utc::now();
        let end = period_end_for(&PlanId::Pro, now).unwrap();
        let days = (end - now).num_days();
        assert!((28..=31).contains(&days), "unexpected term: {days} days");
    }

    #[test]
    fn yearly_period_is_about_one_year() {
        let now = Utc::now();
        let end = period_end_for(&PlanId::Yearly, now).unwrap();
        let days = (end - now).num_days();
        assert!((365..=366).contains(&days), "unexpected term: {days} days");
    }
}
