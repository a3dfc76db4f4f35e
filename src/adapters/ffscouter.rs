use crate::adapters::http::{send_json, upstream_error, RetryPolicy};
use crate::domain::model::MemberId;
use crate::utils::error::Result;
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_FFSCOUTER_BASE_URL: &str = "https://ffscouter.com/api/v1";
const SERVICE: &str = "FFScouter";

/// FFScouter v1 `get-stats` endpoint.
pub struct FfScouterClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl FfScouterClient {
    pub fn new(http: Client, base_url: &str, api_key: &str, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retry,
        }
    }

    /// Fetch estimates for one batch of targets. The raw body is returned;
    /// its envelope varies and is normalized by the caller.
    pub async fn fetch_stats(&self, targets: &[MemberId]) -> Result<Value> {
        let url = format!("{}/get-stats", self.base_url);
        let url = url.as_str();
        let targets = join_targets(targets);
        let targets = targets.as_str();

        self.retry
            .run(SERVICE, move |_| async move {
                let request = self
                    .http
                    .get(url)
                    .query(&[("key", self.api_key.as_str()), ("targets", targets)]);
                let payload = send_json(SERVICE, request).await?;
                match upstream_error(SERVICE, &payload, &[]) {
                    Some(err) => Err(err),
                    None => Ok(payload),
                }
            })
            .await
    }
}

fn join_targets(ids: &[MemberId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
