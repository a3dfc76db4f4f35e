use crate::adapters::storage::LocalStorage;
use crate::config::cli::CliConfig;
use crate::config::env::EnvSource;
use crate::config::RunConfig;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::FactionStatsPipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

/// Resolve configuration and run the whole fetch. Configuration problems
/// surface before any request is sent.
pub async fn run(cli: &CliConfig, env: &EnvSource) -> Result<RunSummary> {
    let config = RunConfig::resolve(cli, env)?;
    config.validate()?;
    tracing::debug!("Run config: {:?}", config);

    let pipeline = FactionStatsPipeline::new(LocalStorage::default(), config)?;
    EtlEngine::new_with_monitoring(pipeline, cli.monitor)
        .run()
        .await
}
