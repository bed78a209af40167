use formats::{AutoPostingResult, parse_auto_posting_results};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("auto-posting request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("auto-posting service answered {0}")]
    Status(StatusCode),
    #[error("auto-posting response is not a result list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the auto-posting analysis endpoint.
#[derive(Debug, Clone)]
pub struct AutoPostingClient {
    http: reqwest::Client,
    base_url: String,
}

impl AutoPostingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// `GET {base_url}?analsPostingGroupId={group_id}`.
    pub async fn fetch_results(&self, group_id: &str) -> Result<Vec<AutoPostingResult>, FetchError> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("analsPostingGroupId", group_id)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = resp.text().await?;
        let results = parse_auto_posting_results(&body)?;
        debug!(group_id, count = results.len(), "auto-posting results fetched");
        Ok(results)
    }
}
