use crate::adapters::http::{is_empty_payload, send_json, upstream_error, RetryPolicy};
use crate::utils::error::{Result, ScoutError};
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_TORN_BASE_URL: &str = "https://api.torn.com/v2";
const SERVICE: &str = "Torn";
const SELECTIONS: &str = "basic,members";
/// In-body codes worth another attempt: too many requests, IP block,
/// API disabled, backend error.
const TRANSIENT_ERROR_CODES: [i64; 4] = [5, 8, 9, 17];

/// Torn v2 faction endpoint.
pub struct TornClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl TornClient {
    pub fn new(http: Client, base_url: &str, api_key: &str, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            retry,
        }
    }

    fn faction_url(&self, faction_id: &str) -> String {
        format!("{}/faction/{}", self.base_url, faction_id)
    }

    /// Fetch `basic,members` for a faction. Each attempt tries the
    /// `Authorization: ApiKey` header first and falls back to the `key`
    /// query parameter when that fails.
    pub async fn fetch_faction(&self, faction_id: &str) -> Result<Value> {
        let url = self.faction_url(faction_id);
        let url = url.as_str();

        self.retry
            .run(SERVICE, move |attempt| async move {
                match self.fetch_with_header(url).await {
                    Ok(payload) => Ok(payload),
                    Err(e) => {
                        tracing::debug!(
                            "📡 Torn header auth failed on attempt {}: {}; trying query key",
                            attempt,
                            e
                        );
                        self.fetch_with_query_key(url).await
                    }
                }
            })
            .await
    }

    async fn fetch_with_header(&self, url: &str) -> Result<Value> {
        let request = self
            .http
            .get(url)
            .query(&[("selections", SELECTIONS)])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("ApiKey {}", self.api_key),
            );
        Self::check_payload(send_json(SERVICE, request).await?)
    }

    async fn fetch_with_query_key(&self, url: &str) -> Result<Value> {
        let request = self
            .http
            .get(url)
            .query(&[("selections", SELECTIONS), ("key", self.api_key.as_str())]);
        Self::check_payload(send_json(SERVICE, request).await?)
    }

    fn check_payload(payload: Value) -> Result<Value> {
        if is_empty_payload(&payload) {
            return Err(ScoutError::EmptyResponseError {
                service: SERVICE.to_string(),
            });
        }
        if let Some(err) = upstream_error(SERVICE, &payload, &TRANSIENT_ERROR_CODES) {
            return Err(err);
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::build_client;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &MockServer) -> TornClient {
        let http = build_client(Duration::from_secs(5)).unwrap();
        TornClient::new(
            http,
            &server.base_url(),
            "secret",
            RetryPolicy::new(3, Duration::from_millis(5)),
        )
    }

    #[tokio::test]
    async fn test_fetch_faction_with_header_auth() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/faction/42")
                .query_param("selections", "basic,members")
                .header("Authorization", "ApiKey secret");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"basic": {"name": "Alpha"}, "members": []}));
        });

        let payload = client_for(&server).fetch_faction("42").await.unwrap();

        api_mock.assert();
        assert_eq!(payload["basic"]["name"], "Alpha");
    }

    #[tokio::test]
    async fn test_falls_back_to_query_key() {
        let server = MockServer::start();
        let header_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/faction/42")
                .header_exists("Authorization");
            then.status(500);
        });
        let query_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/faction/42")
                .query_param("key", "secret");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"name": "Beta", "members": [{"id": 1}]}));
        });

        let payload = client_for(&server).fetch_faction("42").await.unwrap();

        header_mock.assert_hits(1);
        query_mock.assert_hits(1);
        assert_eq!(payload["name"], "Beta");
    }

    #[tokio::test]
    async fn test_empty_response_exhausts_retries() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/faction/42");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({}));
        });

        let result = client_for(&server).fetch_faction("42").await;

        // Header and query-key request per attempt.
        api_mock.assert_hits(6);
        assert!(matches!(
            result,
            Err(ScoutError::RetriesExhaustedError { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_envelope_is_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/faction/42");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"error": {"code": 5, "error": "Too many requests"}}));
        });

        let result = client_for(&server).fetch_faction("42").await;

        api_mock.assert_hits(6);
        match result {
            Err(ScoutError::RetriesExhaustedError { attempts, last_error, .. }) => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("Too many requests"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_key_error_envelope_is_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/faction/42");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"error": {"code": 2, "error": "Incorrect key"}}));
        });

        let result = client_for(&server).fetch_faction("42").await;

        api_mock.assert_hits(2);
        assert!(matches!(
            result,
            Err(ScoutError::UpstreamError { code: Some(2), .. })
        ));
    }
}
