use crate::entities::chain_transaction_entity as chain_transactions;
use crate::error::{AppError, AppResult};
use crate::external::ChainService;
use crate::models::*;
use crate::utils::content_digest;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

/// LIKE wildcards in user input must match literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Notarizes content on the public ledger and keeps the per-user
/// transaction log.
#[derive(Clone)]
pub struct NotaryService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
    chain: ChainService,
}

impl NotaryService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>, chain: ChainService) -> Self {
        Self {
            pool: pool.into(),
            chain,
        }
    }

    /// Hash the content, submit the digest, and record the transaction.
    ///
    /// The record is appended as soon as submission succeeds; the bounded
    /// confirmation poll that follows only decides what we report back.
    /// An exhausted poll is `timed_out` ("check later"), never a failure,
    /// and never removes the record.
    pub async fn notarize(&self, user_id: i64, request: NotarizeRequest) -> AppResult<NotarizeResponse> {
        if request.content.is_empty() {
            return Err(AppError::ValidationError(
                "Nothing to notarize".to_string(),
            ));
        }

        let digest = content_digest(&request.content);
        let signature = self.chain.submit_digest(&digest).await?;

        let record = chain_transactions::ActiveModel {
            user_id: Set(user_id),
            signature: Set(signature.clone()),
            content_hash: Set(digest),
            topic: Set(request.topic),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        let confirmation = self.chain.await_confirmation(&signature).await;
        if confirmation == ConfirmationStatus::TimedOut {
            log::info!("Transaction {signature} submitted but unconfirmed; check later");
        }

        Ok(NotarizeResponse {
            record: TransactionResponse::from(record),
            confirmation,
        })
    }

    /// Newest first.
    pub async fn list_transactions(
        &self,
        user_id: i64,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<TransactionResponse>> {
        let total = chain_transactions::Entity::find()
            .filter(chain_transactions::Column::UserId.eq(user_id))
            .count(&*self.pool)
            .await? as i64;

        let models = chain_transactions::Entity::find()
            .filter(chain_transactions::Column::UserId.eq(user_id))
            .order_by_desc(chain_transactions::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&*self.pool)
            .await?;

        let items = models
            .into_iter()
            .map(TransactionResponse::from)
            .collect::<Vec<_>>();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            params.get_limit(),
            total,
        ))
    }

    /// Case-insensitive substring match against signature or content hash,
    /// done in the store; the newest hit wins.
    pub async fn search(&self, user_id: i64, query: &str) -> AppResult<TransactionResponse> {
        let needle = query.trim();
        if needle.is_empty() {
            return Err(AppError::ValidationError("Empty search query".to_string()));
        }
        let pattern = format!("%{}%", escape_like(needle));

        chain_transactions::Entity::find()
            .filter(chain_transactions::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(Expr::col(chain_transactions::Column::Signature).ilike(pattern.as_str()))
                    .add(
                        Expr::col(chain_transactions::Column::ContentHash)
                            .ilike(pattern.as_str()),
                    ),
            )
            .order_by_desc(chain_transactions::Column::CreatedAt)
            .one(&*self.pool)
            .await?
            .map(TransactionResponse::from)
            .ok_or_else(|| AppError::NotFound("No matching transaction".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn chain() -> ChainService {
        ChainService::new(ChainConfig {
            rpc_url: "http://localhost:0".into(),
            confirm_attempts: 1,
            confirm_interval_secs: 0,
        })
    }

    fn record() -> chain_transactions::Model {
        chain_transactions::Model {
            id: 7,
            user_id: 1,
            signature: "5igNaTure".into(),
            content_hash: "abc123".into(),
            topic: "solar flares".into(),
            created_at: Some(Utc::now()),
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn search_matches_in_the_store_newest_first() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![record()]])
                .into_connection(),
        );

        let svc = NotaryService::new(db.clone(), chain());
        let found = svc.search(1, "ABC").await.unwrap();
        assert_eq!(found.id, 7);

        drop(svc);
        let db = Arc::into_inner(db).expect("test holds the last reference");
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%ABC%"));
        assert!(sql.contains("DESC"));
    }

    #[tokio::test]
    async fn search_miss_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<chain_transactions::Model>::new()])
            .into_connection();

        let err = NotaryService::new(db, chain())
            .search(1, "nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = NotaryService::new(db, chain())
            .search(1, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
