use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::models::{DeployedAgent, GeneratedImagePrompt, GeneratedPost, GeneratedScript};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Client for the generative-AI backend. Prompt templates and schema
/// validation live on the other side; this side only ships topics over
/// and maps failures to `UpstreamError` so no quota is ever charged for
/// a generation that did not happen.
#[derive(Clone)]
pub struct GeneratorService {
    http: Client,
    cfg: GeneratorConfig,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    topic: &'a str,
}

impl GeneratorService {
    pub fn new(cfg: GeneratorConfig) -> Self {
        let http = Client::builder()
            .user_agent("curiogrid-backend/generator")
            .build()
            .expect("reqwest client");
        Self { http, cfg }
    }

    async fn generate<T: DeserializeOwned>(&self, kind: &str, topic: &str) -> AppResult<T> {
        let url = format!("{}/v1/generate/{kind}", self.cfg.base_url);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.cfg.api_key)
            .json(&GenerateBody { topic })
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Generator unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "Generator returned HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Generator returned invalid JSON: {e}")))
    }

    pub async fn generate_post(&self, topic: &str) -> AppResult<GeneratedPost> {
        self.generate("post", topic).await
    }

    pub async fn generate_image_prompt(&self, topic: &str) -> AppResult<GeneratedImagePrompt> {
        self.generate("image-prompt", topic).await
    }

    pub async fn generate_script(&self, topic: &str) -> AppResult<GeneratedScript> {
        self.generate("script", topic).await
    }

    pub async fn deploy_agent(&self, topic: &str) -> AppResult<DeployedAgent> {
        self.generate("agent", topic).await
    }
}
