use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "plan_id")]
pub enum PlanId {
    #[serde(rename = "Starter")]
    #[sea_orm(string_value = "starter")]
    Starter,
    #[serde(rename = "Pro")]
    #[sea_orm(string_value = "pro")]
    Pro,
    #[serde(rename = "Yearly")]
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanId::Starter => write!(f, "Starter"),
            PlanId::Pro => write!(f, "Pro"),
            PlanId::Yearly => write!(f, "Yearly"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub plan: PlanId,
    pub posts_used: i64,
    pub posts_total: i64,
    pub images_used: i64,
    pub images_total: i64,
    pub scripts_used: i64,
    pub scripts_total: i64,
    pub agents_used: i64,
    pub agents_total: i64,
    pub current_period_end: Option<DateTime<Utc>>,
    pub pending_order_id: Option<String>,
    pub pending_plan: Option<PlanId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
