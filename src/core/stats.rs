//! FFScouter response normalization and merging.

use crate::core::roster::as_member_id;
use crate::domain::model::{Identifier, StatEntry};
use serde_json::{Map, Value};
use std::collections::HashMap;

const PLAYER_ID_KEYS: [&str; 5] = ["player_id", "playerId", "id", "user_id", "userId"];
const ESTIMATE_KEYS: [&str; 3] = ["bs_estimate_human", "bs_estimate", "bs"];
const FAIR_FIGHT_KEYS: [&str; 3] = ["fair_fight", "fairFight", "ff"];
const UPDATED_KEYS: [&str; 3] = ["last_updated", "lastUpdated", "updated_at"];

/// Flatten any supported envelope into stat entries: a bare array, an
/// object with a `results` or `data` array, or an object keyed by player id.
pub fn normalize_batch(response: &Value) -> Vec<StatEntry> {
    match response {
        Value::Array(items) => items.iter().filter_map(|v| parse_entry(v, None)).collect(),
        Value::Object(obj) => {
            if let Some(Value::Array(items)) = obj.get("results") {
                items.iter().filter_map(|v| parse_entry(v, None)).collect()
            } else if let Some(Value::Array(items)) = obj.get("data") {
                items.iter().filter_map(|v| parse_entry(v, None)).collect()
            } else {
                obj.iter()
                    .filter_map(|(key, v)| parse_entry(v, Some(key)))
                    .collect()
            }
        }
        _ => Vec::new(),
    }
}

/// `fallback_id` is the object key when the envelope is keyed by player id.
fn parse_entry(value: &Value, fallback_id: Option<&str>) -> Option<StatEntry> {
    let obj = value.as_object()?;

    let player_id = match first_usable(obj, &PLAYER_ID_KEYS, to_identifier) {
        Some(id) => id,
        None => Identifier::parse(fallback_id?),
    };

    let bs_estimate_human = first_usable(obj, &ESTIMATE_KEYS, human_text);
    let bs_estimate = obj
        .get("bs_estimate")
        .and_then(Value::as_f64)
        .or_else(|| bs_estimate_human.as_deref().and_then(parse_battlestat));

    let fair_fight = first_usable(obj, &FAIR_FIGHT_KEYS, parse_number);
    let last_updated = first_usable(obj, &UPDATED_KEYS, parse_timestamp);

    if bs_estimate_human.is_none() && fair_fight.is_none() {
        return None;
    }

    Some(StatEntry {
        player_id,
        bs_estimate,
        bs_estimate_human,
        fair_fight,
        last_updated,
    })
}

/// First alias whose value `parse` accepts; blank or malformed values fall
/// through to the next alias.
fn first_usable<T>(
    obj: &Map<String, Value>,
    keys: &[&str],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(parse)
}

fn to_identifier(raw: &Value) -> Option<Identifier> {
    if let Some(id) = as_member_id(raw) {
        return Some(Identifier::Numeric(id));
    }
    match raw {
        Value::String(s) if !s.trim().is_empty() => Some(Identifier::Text(s.clone())),
        Value::Number(n) => Some(Identifier::Text(n.to_string())),
        _ => None,
    }
}

fn human_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse estimates such as `"1,234,567"`, `"2.5m"` or `"3B"`.
pub fn parse_battlestat(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "--" {
        return None;
    }

    let lower = cleaned.to_ascii_lowercase();
    let (digits, multiplier) = match lower.chars().last() {
        Some('b') => (&lower[..lower.len() - 1], 1e9),
        Some('m') => (&lower[..lower.len() - 1], 1e6),
        Some('k') => (&lower[..lower.len() - 1], 1e3),
        _ => (lower.as_str(), 1.0),
    };

    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f * multiplier)
}

/// Accumulates entries across batches. A repeated player id replaces the
/// earlier entry in place.
#[derive(Debug, Default)]
pub struct StatsCollector {
    entries: Vec<StatEntry>,
    positions: HashMap<Identifier, usize>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, batch: Vec<StatEntry>) {
        for entry in batch {
            match self.positions.get(&entry.player_id) {
                Some(&pos) => self.entries[pos] = entry,
                None => {
                    self.positions
                        .insert(entry.player_id.clone(), self.entries.len());
                    self.entries.push(entry);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<StatEntry> {
        self.entries
    }
}
