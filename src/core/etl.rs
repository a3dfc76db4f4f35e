use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting faction stats fetch");
        self.monitor.log_stats("Start");

        let roster = self.pipeline.extract().await?;
        tracing::info!(
            "✅ Roster: {} ({} members)",
            roster.faction_name,
            roster.member_ids.len()
        );
        self.monitor.log_stats("Roster");

        let report = self.pipeline.transform(roster).await?;
        let batches_failed = report.failed_batches();
        let batches_ok = report.batches.len() - batches_failed;
        if batches_failed > 0 {
            tracing::warn!(
                "⚠️ {} of {} batches failed; writing partial results",
                batches_failed,
                report.batches.len()
            );
        }
        self.monitor.log_stats("Stats");

        let output_path = self.pipeline.load(&report).await?;
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            faction_name: report.roster.faction_name.clone(),
            member_count: report.roster.member_ids.len(),
            stats_collected: report.entries.len(),
            batches_ok,
            batches_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BatchOutcome, Roster, StatsReport};
    use crate::utils::error::ScoutError;
    use async_trait::async_trait;

    struct StubPipeline {
        fail_extract: bool,
    }

    #[async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Roster> {
            if self.fail_extract {
                return Err(ScoutError::NoMembersError {
                    faction_id: "7".to_string(),
                });
            }
            Ok(Roster {
                faction_id: "7".to_string(),
                faction_name: "Stub".to_string(),
                member_count: 3,
                member_ids: vec![1, 2, 3],
            })
        }

        async fn transform(&self, roster: Roster) -> Result<StatsReport> {
            let batches = vec![
                BatchOutcome {
                    index: 1,
                    requested: 2,
                    received: 0,
                    error: Some("HTTP 502".to_string()),
                },
                BatchOutcome {
                    index: 2,
                    requested: 1,
                    received: 0,
                    error: None,
                },
            ];
            Ok(StatsReport {
                roster,
                entries: Vec::new(),
                batches,
            })
        }

        async fn load(&self, _report: &StatsReport) -> Result<String> {
            Ok("out.json".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_summarizes_batches() {
        let engine = EtlEngine::new(StubPipeline { fail_extract: false });
        let summary = engine.run().await.unwrap();

        assert_eq!(summary.output_path, "out.json");
        assert_eq!(summary.faction_name, "Stub");
        assert_eq!(summary.member_count, 3);
        assert_eq!(summary.stats_collected, 0);
        assert_eq!(summary.batches_ok, 1);
        assert_eq!(summary.batches_failed, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_extract_error() {
        let engine = EtlEngine::new(StubPipeline { fail_extract: true });
        let result = engine.run().await;

        assert!(matches!(result, Err(ScoutError::NoMembersError { .. })));
    }
}
