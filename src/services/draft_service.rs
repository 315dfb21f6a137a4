use crate::entities::draft_entity as drafts;
use crate::error::AppResult;
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DraftService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
}

impl DraftService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// Save a generation result. Identifier and timestamp are assigned
    /// here, never by the client.
    pub async fn add_draft(&self, user_id: i64, request: CreateDraftRequest) -> AppResult<DraftResponse> {
        let draft = drafts::ActiveModel {
            user_id: Set(user_id),
            category: Set(request.category),
            topic: Set(request.topic),
            content: Set(serde_json::to_value(&request.content)?),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        DraftResponse::try_from(draft)
    }

    /// Newest first.
    pub async fn list_drafts(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<DraftResponse>> {
        let total = drafts::Entity::find()
            .filter(drafts::Column::UserId.eq(user_id))
            .count(&*self.pool)
            .await? as i64;

        let models = drafts::Entity::find()
            .filter(drafts::Column::UserId.eq(user_id))
            .order_by_desc(drafts::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&*self.pool)
            .await?;

        let items = models
            .into_iter()
            .map(DraftResponse::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            params.get_limit(),
            total,
        ))
    }

    /// Idempotent: deleting a draft that is already gone succeeds quietly.
    pub async fn delete_draft(&self, user_id: i64, draft_id: i64) -> AppResult<()> {
        drafts::Entity::delete_many()
            .filter(drafts::Column::UserId.eq(user_id))
            .filter(drafts::Column::Id.eq(draft_id))
            .exec(&*self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContentCategory;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn draft(id: i64) -> drafts::Model {
        drafts::Model {
            id,
            user_id: 1,
            category: ContentCategory::Posts,
            topic: "solar flares".into(),
            content: json!({ "post": "Big news" }),
            created_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn listing_orders_newest_first_in_the_store() {
        let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(2)))]);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row]])
                .append_query_results([vec![draft(2), draft(1)]])
                .into_connection(),
        );

        let svc = DraftService::new(db.clone());
        let page = svc
            .list_drafts(1, &PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        // Debug output quotes the SQL, so identifiers appear as \"...\".
        drop(svc);
        let db = Arc::into_inner(db).expect("test holds the last reference");
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains(r#"ORDER BY \"drafts\".\"created_at\" DESC"#));
    }
}
