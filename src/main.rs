use clap::Parser;
use faction_scout::utils::logger;
use faction_scout::{CliConfig, EnvSource};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let env = EnvSource::load(cli.env_file.as_deref());

    match faction_scout::run(&cli, &env).await {
        Ok(summary) => {
            tracing::info!("✅ Fetch completed");
            println!(
                "✅ Collected {} stats for {} members of {}",
                summary.stats_collected, summary.member_count, summary.faction_name
            );
            println!("📁 Output saved to: {}", summary.output_path);
            if summary.batches_failed > 0 {
                println!(
                    "⚠️ {} of {} batches failed",
                    summary.batches_failed,
                    summary.batches_ok + summary.batches_failed
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
