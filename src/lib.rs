pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use app::run;
pub use config::{cli::CliConfig, env::EnvSource, RunConfig};
pub use core::{etl::EtlEngine, pipeline::FactionStatsPipeline};
pub use domain::model::{OutputFormat, RunSummary, StatEntry};
pub use utils::error::{Result, ScoutError};
