pub mod cli;
pub mod env;

use crate::adapters::http::RetryPolicy;
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_identifier, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use cli::CliConfig;
use env::{EnvSource, FACTION_ID_VAR, FFSCOUTER_KEY_VARS, TORN_KEY_VARS};
use std::time::Duration;

/// Everything a run needs, resolved from flags and environment.
#[derive(Clone)]
pub struct RunConfig {
    pub torn_base_url: String,
    pub ffscouter_base_url: String,
    pub torn_api_key: String,
    pub ffscouter_api_key: String,
    pub faction_id: String,
    pub output_path: String,
    pub output_format: OutputFormat,
    pub batch_size: usize,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl RunConfig {
    /// Required values are checked in the order FACTION_ID, Torn key,
    /// FFScouter key; the first one missing is reported.
    pub fn resolve(cli: &CliConfig, env: &EnvSource) -> Result<Self> {
        let faction_id = required(env, &[FACTION_ID_VAR])?;
        let torn_api_key = required(env, &TORN_KEY_VARS)?;
        let ffscouter_api_key = required(env, &FFSCOUTER_KEY_VARS)?;

        Ok(Self {
            torn_base_url: cli.torn_base_url.clone(),
            ffscouter_base_url: cli.ffscouter_base_url.clone(),
            torn_api_key,
            ffscouter_api_key,
            faction_id,
            output_path: cli.output_path.clone(),
            output_format: cli.format,
            batch_size: cli.batch_size,
            request_timeout: Duration::from_secs(cli.timeout_secs),
            retry: RetryPolicy::new(cli.retries, Duration::from_millis(cli.retry_delay_ms)),
        })
    }
}

fn required(env: &EnvSource, names: &[&str]) -> Result<String> {
    env.first_of(names)
        .map(str::to_string)
        .ok_or_else(|| ScoutError::MissingConfigError {
            field: names[0].to_string(),
        })
}

// Keys stay out of debug logs.
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("torn_base_url", &self.torn_base_url)
            .field("ffscouter_base_url", &self.ffscouter_base_url)
            .field("torn_api_key", &"<redacted>")
            .field("ffscouter_api_key", &"<redacted>")
            .field("faction_id", &self.faction_id)
            .field("output_path", &self.output_path)
            .field("output_format", &self.output_format)
            .field("batch_size", &self.batch_size)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_identifier(FACTION_ID_VAR, &self.faction_id)?;
        validate_url("torn_base_url", &self.torn_base_url)?;
        validate_url("ffscouter_base_url", &self.ffscouter_base_url)?;
        validate_path("out", &self.output_path)?;
        validate_positive_number("batch", self.batch_size, 1)?;
        validate_range("timeout", self.request_timeout.as_secs(), 1, 300)?;
        validate_range("retries", self.retry.max_attempts, 1, 10)?;
        Ok(())
    }
}

impl ConfigProvider for RunConfig {
    fn torn_base_url(&self) -> &str {
        &self.torn_base_url
    }

    fn ffscouter_base_url(&self) -> &str {
        &self.ffscouter_base_url
    }

    fn torn_api_key(&self) -> &str {
        &self.torn_api_key
    }

    fn ffscouter_api_key(&self) -> &str {
        &self.ffscouter_api_key
    }

    fn faction_id(&self) -> &str {
        &self.faction_id
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}
