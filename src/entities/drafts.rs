use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "content_category")]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    #[sea_orm(string_value = "posts")]
    Posts,
    #[sea_orm(string_value = "images")]
    Images,
    #[sea_orm(string_value = "scripts")]
    Scripts,
    #[sea_orm(string_value = "agents")]
    Agents,
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentCategory::Posts => write!(f, "posts"),
            ContentCategory::Images => write!(f, "images"),
            ContentCategory::Scripts => write!(f, "scripts"),
            ContentCategory::Agents => write!(f, "agents"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "drafts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub category: ContentCategory,
    pub topic: String,
    /// Whatever shape the generator produced; stored and returned verbatim.
    pub content: Json,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
