use crate::adapters::ffscouter::DEFAULT_FFSCOUTER_BASE_URL;
use crate::adapters::torn::DEFAULT_TORN_BASE_URL;
use crate::domain::model::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "faction-scout", version)]
#[command(about = "Fetch FFScouter battle-stat estimates for all members of a Torn faction")]
pub struct CliConfig {
    /// Path to a .env file to load (default: ./.env, then ../.env)
    #[arg(short, long = "env", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Output file; a .js extension writes a window.FFSCOUTER_DEFAULTS script
    #[arg(short, long = "out", default_value = "ffscouter_defaults.json")]
    pub output_path: String,

    /// Batch size for FFScouter requests
    #[arg(short, long = "batch", default_value_t = 100)]
    pub batch_size: usize,

    /// Shape of the `data` field
    #[arg(long, value_enum, default_value_t = OutputFormat::Records)]
    pub format: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Attempts per request before giving up
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Linear backoff base between attempts
    #[arg(long, default_value_t = 1000, hide = true)]
    pub retry_delay_ms: u64,

    #[arg(long, default_value = DEFAULT_TORN_BASE_URL)]
    pub torn_base_url: String,

    #[arg(long = "ffscouter-base-url", default_value = DEFAULT_FFSCOUTER_BASE_URL)]
    pub ffscouter_base_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::parse_from(["faction-scout"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = CliConfig::default();
        assert_eq!(cli.output_path, "ffscouter_defaults.json");
        assert_eq!(cli.batch_size, 100);
        assert_eq!(cli.format, OutputFormat::Records);
        assert_eq!(cli.timeout_secs, 15);
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.retry_delay_ms, 1000);
        assert_eq!(cli.torn_base_url, "https://api.torn.com/v2");
        assert!(cli.env_file.is_none());
    }

    #[test]
    fn test_short_flags() {
        let cli = CliConfig::parse_from([
            "faction-scout",
            "-e",
            "secrets.env",
            "-o",
            "out.js",
            "-b",
            "25",
            "--format",
            "map",
        ]);
        assert_eq!(cli.env_file, Some(PathBuf::from("secrets.env")));
        assert_eq!(cli.output_path, "out.js");
        assert_eq!(cli.batch_size, 25);
        assert_eq!(cli.format, OutputFormat::Map);
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        CliConfig::command().debug_assert();
    }
}
