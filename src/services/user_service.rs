use crate::entities::{
    chain_transaction_entity as chain_transactions, draft_entity as drafts, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// Profile with plan, usage snapshot, and simple counts.
    pub async fn get_user_profile(
        &self,
        user_id: i64,
    ) -> AppResult<(UserResponse, UserStatistics)> {
        let user = users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let total_drafts = drafts::Entity::find()
            .filter(drafts::Column::UserId.eq(user_id))
            .count(&*self.pool)
            .await? as i64;
        let total_transactions = chain_transactions::Entity::find()
            .filter(chain_transactions::Column::UserId.eq(user_id))
            .count(&*self.pool)
            .await? as i64;

        Ok((
            UserResponse::from(user),
            UserStatistics {
                total_drafts,
                total_transactions,
            },
        ))
    }
}
