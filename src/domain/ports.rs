use crate::adapters::http::RetryPolicy;
use crate::domain::model::{OutputFormat, Roster, StatsReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn torn_base_url(&self) -> &str;
    fn ffscouter_base_url(&self) -> &str;
    fn torn_api_key(&self) -> &str;
    fn ffscouter_api_key(&self) -> &str;
    fn faction_id(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn batch_size(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn retry_policy(&self) -> RetryPolicy;
}

/// Roster in, stats out, one file written.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Fetch the faction roster and extract its unique member ids.
    async fn extract(&self) -> Result<Roster>;
    /// Fetch and merge stat estimates for the roster in batches.
    async fn transform(&self, roster: Roster) -> Result<StatsReport>;
    /// Write the report and return the path written.
    async fn load(&self, report: &StatsReport) -> Result<String>;
}
