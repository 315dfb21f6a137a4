use crate::entities::{ContentCategory, PlanId, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::plan::{Quota, UsageSnapshot};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;

/// Per-category used/total column pair on the user row.
fn usage_columns(category: ContentCategory) -> (users::Column, users::Column) {
    match category {
        ContentCategory::Posts => (users::Column::PostsUsed, users::Column::PostsTotal),
        ContentCategory::Images => (users::Column::ImagesUsed, users::Column::ImagesTotal),
        ContentCategory::Scripts => (users::Column::ScriptsUsed, users::Column::ScriptsTotal),
        ContentCategory::Agents => (users::Column::AgentsUsed, users::Column::AgentsTotal),
    }
}

/// The usage ledger. All writes go through single-statement updates on the
/// user row, so concurrent requests serialize in the store rather than in
/// this process.
#[derive(Clone)]
pub struct UsageService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
}

impl UsageService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    pub async fn get(&self, user_id: i64) -> AppResult<UsageSnapshot> {
        let user = users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(UsageSnapshot::from_user(&user))
    }

    /// Replace the entire ledger with the plan's catalog defaults.
    /// One statement for all four categories; a reader never sees a mix of
    /// old-plan and new-plan quotas.
    pub async fn reset(&self, user_id: i64, plan: &PlanId) -> AppResult<()> {
        let defaults = plan.default_quotas();
        let result = apply_quota_defaults(users::Entity::update_many(), &defaults)
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(chrono::Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .exec(&*self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    /// Charge one unit in a category and return the updated quota.
    ///
    /// Unlimited categories are never charged. Bounded categories use a
    /// guarded `used < total` update, so two concurrent charges both land
    /// (no lost update) and `used` can never pass `total` even if a caller
    /// skipped the entitlement gate.
    pub async fn increment(&self, user_id: i64, category: ContentCategory) -> AppResult<Quota> {
        let user = users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let quota = UsageSnapshot::from_user(&user).quota(category);
        if quota.is_unlimited() {
            return Ok(quota);
        }

        let (used_col, total_col) = usage_columns(category);
        let result = users::Entity::update_many()
            .col_expr(used_col, Expr::col(used_col).add(1))
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(chrono::Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .filter(Expr::col(used_col).lt(Expr::col(total_col)))
            .exec(&*self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::QuotaExceeded {
                plan: user.plan.to_string(),
                category: category.to_string(),
            });
        }

        // Re-read for the authoritative count; a concurrent charge may have
        // landed between our update and this read, which is fine for display.
        self.get(user_id).await.map(|s| s.quota(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn starter_user(posts_used: i64) -> users::Model {
        users::Model {
            id: 1,
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "x".into(),
            plan: PlanId::Starter,
            posts_used,
            posts_total: 10,
            images_used: 0,
            images_total: 2,
            scripts_used: 0,
            scripts_total: 1,
            agents_used: 0,
            agents_total: 0,
            current_period_end: None,
            pending_order_id: None,
            pending_plan: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn increment_charges_and_returns_updated_quota() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![starter_user(3)], vec![starter_user(4)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let quota = UsageService::new(db)
            .increment(1, ContentCategory::Posts)
            .await
            .unwrap();
        assert_eq!(quota.used, 4);
        assert_eq!(quota.total, 10);
    }

    #[tokio::test]
    async fn increment_with_spent_quota_is_quota_exceeded() {
        // The guarded update matches no row once used == total.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![starter_user(10)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = UsageService::new(db)
            .increment(1, ContentCategory::Posts)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn unlimited_increment_never_writes() {
        let mut user = starter_user(5);
        user.plan = PlanId::Yearly;
        user.posts_total = -1;

        // Only the lookup is queued; any update would run dry and fail.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user]])
            .into_connection();

        let quota = UsageService::new(db)
            .increment(1, ContentCategory::Posts)
            .await
            .unwrap();
        assert!(quota.is_unlimited());
        assert_eq!(quota.used, 5);
    }

    #[tokio::test]
    async fn guarded_update_compares_used_against_total() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![starter_user(3)], vec![starter_user(4)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let svc = UsageService::new(db.clone());
        svc.increment(1, ContentCategory::Posts).await.unwrap();

        drop(svc);
        let db = Arc::into_inner(db).expect("test holds the last reference");
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("posts_used"));
        assert!(sql.contains("posts_total"));
    }
}

/// Write every category's default quota into an update statement.
pub(crate) fn apply_quota_defaults(
    stmt: sea_orm::UpdateMany<users::Entity>,
    defaults: &UsageSnapshot,
) -> sea_orm::UpdateMany<users::Entity> {
    stmt.col_expr(users::Column::PostsUsed, Expr::value(defaults.posts.used))
        .col_expr(users::Column::PostsTotal, Expr::value(defaults.posts.total))
        .col_expr(users::Column::ImagesUsed, Expr::value(defaults.images.used))
        .col_expr(users::Column::ImagesTotal, Expr::value(defaults.images.total))
        .col_expr(users::Column::ScriptsUsed, Expr::value(defaults.scripts.used))
        .col_expr(
            users::Column::ScriptsTotal,
            Expr::value(defaults.scripts.total),
        )
        .col_expr(users::Column::AgentsUsed, Expr::value(defaults.agents.used))
        .col_expr(
            users::Column::AgentsTotal,
            Expr::value(defaults.agents.total),
        )
}
