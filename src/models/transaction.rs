use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::chain_transactions;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotarizeRequest {
    pub content: String,
    pub topic: String,
}

/// Outcome of the bounded confirmation poll. The record is persisted at
/// submission time either way; a timeout is "check later", not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Confirmed,
    TimedOut,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotarizeResponse {
    pub record: TransactionResponse,
    pub confirmation: ConfirmationStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub signature: String,
    pub content_hash: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
}

impl From<chain_transactions::Model> for TransactionResponse {
    fn from(tx: chain_transactions::Model) -> Self {
        Self {
            id: tx.id,
            signature: tx.signature,
            content_hash: tx.content_hash,
            topic: tx.topic,
            created_at: tx.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionSearchQuery {
    /// Case-insensitive substring matched against signature or content hash.
    pub q: String,
}
