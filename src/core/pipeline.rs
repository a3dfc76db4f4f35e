use crate::adapters::ffscouter::FfScouterClient;
use crate::adapters::http::build_client;
use crate::adapters::torn::TornClient;
use crate::core::output::{build_document, render_document};
use crate::core::roster::{extract_member_ids, normalize_roster};
use crate::core::stats::{normalize_batch, StatsCollector};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{BatchOutcome, Roster, StatsReport};
use crate::utils::error::{Result, ScoutError};

/// Torn roster -> FFScouter batches -> one JSON file.
pub struct FactionStatsPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    torn: TornClient,
    ffscouter: FfScouterClient,
}

impl<S: Storage, C: ConfigProvider> FactionStatsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let http = build_client(config.request_timeout())?;
        let retry = config.retry_policy();

        let torn = TornClient::new(
            http.clone(),
            config.torn_base_url(),
            config.torn_api_key(),
            retry,
        );
        let ffscouter = FfScouterClient::new(
            http,
            config.ffscouter_base_url(),
            config.ffscouter_api_key(),
            retry,
        );

        Ok(Self {
            storage,
            config,
            torn,
            ffscouter,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FactionStatsPipeline<S, C> {
    async fn extract(&self) -> Result<Roster> {
        let faction_id = self.config.faction_id();
        tracing::info!("👥 Fetching faction members for faction {}...", faction_id);

        let payload = self.torn.fetch_faction(faction_id).await?;
        let normalized = normalize_roster(&payload, faction_id);
        let member_ids = extract_member_ids(&normalized.members);

        tracing::debug!(
            "Roster for {}: {} entries, {} unique ids",
            normalized.faction_name,
            normalized.members.len(),
            member_ids.len()
        );

        if member_ids.is_empty() {
            return Err(ScoutError::NoMembersError {
                faction_id: faction_id.to_string(),
            });
        }

        Ok(Roster {
            faction_id: faction_id.to_string(),
            faction_name: normalized.faction_name,
            member_count: normalized.members.len(),
            member_ids,
        })
    }

    async fn transform(&self, roster: Roster) -> Result<StatsReport> {
        let batch_size = self.config.batch_size().max(1);
        tracing::info!(
            "🔎 Found {} unique member ids. Querying FFScouter in batches of {}...",
            roster.member_ids.len(),
            batch_size
        );

        let mut collector = StatsCollector::new();
        let mut batches = Vec::new();

        for (i, chunk) in roster.member_ids.chunks(batch_size).enumerate() {
            let index = i + 1;
            let outcome = match self.ffscouter.fetch_stats(chunk).await {
                Ok(response) => {
                    let entries = normalize_batch(&response);
                    tracing::info!("  Batch {}: got {} stats", index, entries.len());
                    let received = entries.len();
                    collector.extend(entries);
                    BatchOutcome {
                        index,
                        requested: chunk.len(),
                        received,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!("  Batch {} failed: {}", index, e);
                    BatchOutcome {
                        index,
                        requested: chunk.len(),
                        received: 0,
                        error: Some(e.to_string()),
                    }
                }
            };
            batches.push(outcome);
        }

        Ok(StatsReport {
            roster,
            entries: collector.into_entries(),
            batches,
        })
    }

    async fn load(&self, report: &StatsReport) -> Result<String> {
        let output_path = self.config.output_path();
        let document = build_document(
            report,
            self.config.output_format(),
            chrono::Utc::now().timestamp(),
        );
        let rendered = render_document(&document, output_path)?;

        self.storage
            .write_file(output_path, rendered.as_bytes())
            .await?;

        tracing::info!(
            "💾 Wrote {} entries to {} (faction: {}, {:?} format)",
            document.data.len(),
            output_path,
            document.faction_name,
            self.config.output_format()
        );
        Ok(output_path.to_string())
    }
}
