use crate::config::TrendsConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;

/// Client for the upstream trend aggregator. The response body is passed
/// through to the caller unchanged; this service only guards against
/// non-success statuses and non-JSON bodies.
#[derive(Clone)]
pub struct TrendsService {
    http: Client,
    cfg: TrendsConfig,
}

impl TrendsService {
    pub fn new(cfg: TrendsConfig) -> Self {
        let http = Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)",
            )
            .build()
            .expect("reqwest client");
        Self { http, cfg }
    }

    pub async fn fetch(&self, sub: &str, limit: u32) -> AppResult<serde_json::Value> {
        let resp = self
            .http
            .get(&self.cfg.upstream_url)
            .query(&[("sub", sub), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Trend upstream unreachable: {e}")))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(AppError::UpstreamError(format!(
                "Trend upstream returned HTTP {}: {}",
                status.as_u16(),
                text.chars().take(200).collect::<String>()
            )));
        }

        serde_json::from_str(&text).map_err(|_| {
            AppError::UpstreamError(format!(
                "Trend upstream returned invalid JSON: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}
