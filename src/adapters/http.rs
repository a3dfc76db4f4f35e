use crate::utils::error::{Result, ScoutError};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Fixed attempt count with linear backoff: attempt `n` failing waits
/// `n * base_delay` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, service: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(ScoutError::RetriesExhaustedError {
                        service: service.to_string(),
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "⚠️ {} attempt {}/{} failed: {} (retrying in {:?})",
                        service,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send a request and decode its JSON body, mapping non-2xx statuses to
/// `HttpStatusError`.
pub async fn send_json(service: &str, request: RequestBuilder) -> Result<Value> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    tracing::debug!("📡 {} response status: {}", service, status);

    if !status.is_success() {
        return Err(ScoutError::HttpStatusError {
            service: service.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json::<Value>().await?)
}

/// JSON "falsy" values count as an empty response.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Both APIs report failures in-band as `{"error": ...}`, either a bare
/// message or an object with `code` and `error`. Codes listed in
/// `transient_codes` are marked retryable.
pub fn upstream_error(
    service: &str,
    value: &Value,
    transient_codes: &[i64],
) -> Option<ScoutError> {
    let error = value.as_object()?.get("error")?;
    let (code, message) = match error {
        Value::Null | Value::Bool(false) => return None,
        Value::Object(obj) => (
            obj.get("code").and_then(Value::as_i64),
            obj.get("error")
                .or_else(|| obj.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        ),
        Value::String(s) => (None, s.clone()),
        other => (None, other.to_string()),
    };

    Some(ScoutError::UpstreamError {
        service: service.to_string(),
        transient: code.is_some_and(|c| transient_codes.contains(&c)),
        code,
        message,
    })
}
