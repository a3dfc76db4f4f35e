use serde::{Serialize, Serializer};
use std::fmt;

/// Integer id of a faction member as extracted from the roster.
pub type MemberId = u64;

/// An id that serializes as a JSON integer when it is one, else as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Identifier {
    /// Integer if the trimmed text is all digits, the raw text otherwise.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(n) => Identifier::Numeric(n),
            Err(_) => Identifier::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

/// One member's battle-stat estimate, normalized from an FFScouter entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatEntry {
    pub player_id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bs_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bs_estimate_human: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fair_fight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    pub faction_id: String,
    pub faction_name: String,
    /// Raw member entries found before id extraction.
    pub member_count: usize,
    pub member_ids: Vec<MemberId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// 1-based, as printed in the logs.
    pub index: usize,
    pub requested: usize,
    pub received: usize,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct StatsReport {
    pub roster: Roster,
    pub entries: Vec<StatEntry>,
    pub batches: Vec<BatchOutcome>,
}

impl StatsReport {
    pub fn failed_batches(&self) -> usize {
        self.batches.iter().filter(|b| !b.is_success()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `data` is an array of stat entries.
    #[default]
    Records,
    /// `data` maps player id to the human-readable estimate.
    Map,
}

/// Player id to human-readable estimate, serialized as a JSON object in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyStatsMap(pub Vec<(String, String)>);

impl Serialize for LegacyStatsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatsData {
    Records(Vec<StatEntry>),
    Map(LegacyStatsMap),
}

impl StatsData {
    pub fn len(&self) -> usize {
        match self {
            StatsData::Records(entries) => entries.len(),
            StatsData::Map(map) => map.0.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The file written at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct StatsDocument {
    pub faction_id: Identifier,
    pub faction_name: String,
    pub generated_at: i64,
    pub data: StatsData,
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: String,
    pub faction_name: String,
    pub member_count: usize,
    pub stats_collected: usize,
    pub batches_ok: usize,
    pub batches_failed: usize,
}
