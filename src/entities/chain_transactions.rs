use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Append-only ledger of notarized content. Rows are never updated;
/// repeated identical content simply gets another row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "chain_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub signature: String,
    pub content_hash: String,
    pub topic: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
