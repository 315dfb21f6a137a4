use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{ContentCategory, drafts};
use crate::error::{AppError, AppResult};

/// A single timed line of a video script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScriptLine {
    pub time: String,
    pub text: String,
}

/// The saved shape of a generation result. The log preserves whichever
/// variant was produced and hands it back untouched; it never interprets
/// the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DraftContent {
    Image { prompt: String, url: String },
    Post { post: String },
    Agent {
        name: String,
        status: String,
        preview: String,
    },
    Script(Vec<ScriptLine>),
    Text(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDraftRequest {
    pub category: ContentCategory,
    pub topic: String,
    pub content: DraftContent,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DraftResponse {
    pub id: i64,
    pub category: ContentCategory,
    pub topic: String,
    pub content: DraftContent,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<drafts::Model> for DraftResponse {
    type Error = AppError;

    fn try_from(draft: drafts::Model) -> AppResult<Self> {
        let content: DraftContent = serde_json::from_value(draft.content)?;
        Ok(Self {
            id: draft.id,
            category: draft.category,
            topic: draft.topic,
            content,
            created_at: draft.created_at.unwrap_or_else(Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_round_trips() {
        let content = DraftContent::Image {
            prompt: "neon city at dusk".into(),
            url: "https://img.example/abc.png".into(),
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["prompt"], "neon city at dusk");
        let back: DraftContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn post_content_round_trips() {
        let content = DraftContent::Post {
            post: "Big news today".into(),
        };
        let back: DraftContent =
            serde_json::from_value(serde_json::to_value(&content).unwrap()).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn script_content_round_trips_in_order() {
        let content = DraftContent::Script(vec![
            ScriptLine {
                time: "00:00".into(),
                text: "Hook".into(),
            },
            ScriptLine {
                time: "00:05".into(),
                text: "Body".into(),
            },
        ]);
        let back: DraftContent =
            serde_json::from_value(serde_json::to_value(&content).unwrap()).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn agent_and_text_content_round_trip() {
        let agent = DraftContent::Agent {
            name: "TrendBot".into(),
            status: "deployed".into(),
            preview: "Posting hourly".into(),
        };
        let back: DraftContent =
            serde_json::from_value(serde_json::to_value(&agent).unwrap()).unwrap();
        assert_eq!(back, agent);

        let text = DraftContent::Text("plain note".into());
        let back: DraftContent =
            serde_json::from_value(serde_json::to_value(&text).unwrap()).unwrap();
        assert_eq!(back, text);
    }
}
