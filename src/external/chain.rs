use crate::config::ChainConfig;
use crate::error::{AppError, AppResult};
use crate::models::ConfirmationStatus;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Client for the public ledger RPC node. Submission and confirmation are
/// two separate phases: callers persist their record on submission and
/// treat an exhausted confirmation poll as "check later", never as failure.
#[derive(Clone)]
pub struct ChainService {
    http: Client,
    cfg: ChainConfig,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    digest: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    confirmed: bool,
}

impl ChainService {
    pub fn new(cfg: ChainConfig) -> Self {
        let http = Client::builder()
            .user_agent("curiogrid-backend/chain")
            .build()
            .expect("reqwest client");
        Self { http, cfg }
    }

    /// Submit a content digest; returns the transaction signature.
    pub async fn submit_digest(&self, digest: &str) -> AppResult<String> {
        let url = format!("{}/v1/transactions", self.cfg.rpc_url);

        let resp = self
            .http
            .post(&url)
            .json(&SubmitRequest { digest })
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Chain RPC unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamError(format!(
                "Chain RPC returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Chain RPC returned invalid JSON: {e}")))?;
        Ok(body.signature)
    }

    /// Poll for confirmation a fixed number of attempts with a fixed delay.
    /// Gives up quietly: a slow network yields `TimedOut`, not an error.
    pub async fn await_confirmation(&self, signature: &str) -> ConfirmationStatus {
        let url = format!("{}/v1/transactions/{signature}", self.cfg.rpc_url);
        let interval = std::time::Duration::from_secs(self.cfg.confirm_interval_secs);

        for attempt in 1..=self.cfg.confirm_attempts {
            tokio::time::sleep(interval).await;

            match self.http.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    match resp.json::<StatusResponse>().await {
                        Ok(body) if body.confirmed => return ConfirmationStatus::Confirmed,
                        Ok(_) => {}
                        Err(e) => {
                            log::warn!("Chain status parse failed on attempt {attempt}: {e}");
                        }
                    }
                }
                Ok(resp) => {
                    log::warn!(
                        "Chain status HTTP {} on attempt {attempt}",
                        resp.status().as_u16()
                    );
                }
                Err(e) => {
                    log::warn!("Chain status request failed on attempt {attempt}: {e}");
                }
            }
        }

        ConfirmationStatus::TimedOut
    }
}
