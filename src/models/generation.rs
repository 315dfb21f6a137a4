use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::draft::ScriptLine;
use crate::models::plan::Quota;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[schema(example = "solar flares")]
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedPost {
    pub post: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedImagePrompt {
    pub prompt: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedScript {
    pub lines: Vec<ScriptLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeployedAgent {
    pub name: String,
    pub status: String,
    pub preview: String,
}

/// What every generation endpoint returns: the produced content plus the
/// quota for that category after the charge.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse<T> {
    pub content: T,
    pub quota: Quota,
}
