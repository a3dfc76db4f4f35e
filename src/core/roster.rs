//! Roster normalization.
//!
//! The faction endpoint has answered with several layouts over time: members
//! as a flat array, nested one level deeper under `members.members`, at the
//! top level next to `faction`, or (v1) as an object keyed by member id.

use crate::domain::model::MemberId;
use serde_json::{Map, Value};
use std::collections::HashSet;

const MEMBER_ID_KEYS: [&str; 3] = ["player_id", "id", "user_id"];

#[derive(Debug, Clone, PartialEq)]
pub struct RosterPayload {
    pub faction_name: String,
    pub members: Vec<Value>,
}

pub fn normalize_roster(payload: &Value, faction_id: &str) -> RosterPayload {
    let faction = payload
        .get("faction")
        .filter(|f| f.as_object().is_some_and(|obj| !obj.is_empty()))
        .unwrap_or(payload);

    RosterPayload {
        faction_name: resolve_name(faction, payload)
            .unwrap_or_else(|| format!("Faction {}", faction_id)),
        members: find_members(faction, payload),
    }
}

fn find_members(faction: &Value, payload: &Value) -> Vec<Value> {
    if !faction.is_object() {
        return Vec::new();
    }

    match faction.get("members") {
        Some(Value::Array(items)) => return items.clone(),
        Some(Value::Object(obj)) => {
            if let Some(Value::Array(items)) = obj.get("members") {
                return items.clone();
            }
        }
        _ => {}
    }

    if let Some(Value::Array(items)) = payload.get("members") {
        return items.clone();
    }

    match faction.get("members") {
        Some(Value::Object(keyed)) => members_from_keyed(keyed),
        _ => Vec::new(),
    }
}

/// `{"123": {...}, "456": {...}}`: the key doubles as the id.
fn members_from_keyed(keyed: &Map<String, Value>) -> Vec<Value> {
    keyed
        .iter()
        .filter_map(|(key, value)| {
            let mut member = value.as_object()?.clone();
            let has_id = MEMBER_ID_KEYS
                .iter()
                .any(|k| member.get(*k).is_some_and(|v| !v.is_null()));
            if !has_id {
                member.insert("id".to_string(), Value::String(key.clone()));
            }
            Some(Value::Object(member))
        })
        .collect()
}

fn resolve_name(faction: &Value, payload: &Value) -> Option<String> {
    name_of(faction).or_else(|| name_of(payload))
}

fn name_of(value: &Value) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    value
        .get("name")
        .and_then(non_empty)
        .or_else(|| value.get("basic")?.get("name").and_then(non_empty))
}

/// Unique member ids in first-seen order. Members whose id is missing or
/// not an integer are skipped.
pub fn extract_member_ids(members: &[Value]) -> Vec<MemberId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for member in members {
        let Some(obj) = member.as_object() else {
            continue;
        };

        // A blank or non-numeric alias falls through to the next one.
        let id = MEMBER_ID_KEYS
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(as_member_id);

        match id {
            Some(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            None => tracing::debug!("Skipping member without a numeric id: {}", member),
        }
    }

    ids
}

pub(crate) fn as_member_id(value: &Value) -> Option<MemberId> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_members_as_flat_array_under_faction() {
        let payload = json!({
            "faction": {
                "name": "Alpha",
                "members": [{"id": 1}, {"id": 2}]
            }
        });

        let roster = normalize_roster(&payload, "42");

        assert_eq!(roster.faction_name, "Alpha");
        assert_eq!(extract_member_ids(&roster.members), vec![1, 2]);
    }

    #[test]
    fn test_members_nested_under_members_members() {
        let payload = json!({
            "basic": {"name": "Beta"},
            "members": {"members": [{"player_id": "10"}, {"player_id": 11}]}
        });

        let roster = normalize_roster(&payload, "42");

        assert_eq!(roster.faction_name, "Beta");
        assert_eq!(extract_member_ids(&roster.members), vec![10, 11]);
    }

    #[test]
    fn test_members_at_top_level_next_to_faction() {
        let payload = json!({
            "faction": {"basic": {"name": "Gamma"}},
            "members": [{"user_id": 5}]
        });

        let roster = normalize_roster(&payload, "42");

        assert_eq!(roster.faction_name, "Gamma");
        assert_eq!(extract_member_ids(&roster.members), vec![5]);
    }

    #[test]
    fn test_members_keyed_by_id() {
        let payload = json!({
            "name": "Delta",
            "members": {
                "100": {"name": "a"},
                "200": {"name": "b", "id": 200}
            }
        });

        let roster = normalize_roster(&payload, "42");

        assert_eq!(roster.members.len(), 2);
        assert_eq!(extract_member_ids(&roster.members), vec![100, 200]);
    }

    #[test]
    fn test_default_name_when_missing() {
        let roster = normalize_roster(&json!({"members": []}), "42");
        assert_eq!(roster.faction_name, "Faction 42");

        let roster = normalize_roster(&json!({"name": "  ", "members": []}), "7");
        assert_eq!(roster.faction_name, "Faction 7");
    }

    #[test]
    fn test_unknown_shape_yields_no_members() {
        let roster = normalize_roster(&json!({"faction": {"members": "nope"}}), "1");
        assert!(roster.members.is_empty());

        let roster = normalize_roster(&json!([1, 2, 3]), "1");
        assert!(roster.members.is_empty());
    }

    #[test]
    fn test_extract_ids_unique_in_first_seen_order() {
        let members = vec![
            json!({"player_id": 3}),
            json!({"id": "1"}),
            json!({"user_id": 3}),
            json!({"id": 2}),
            json!({"player_id": "1"}),
            json!({"id": 2.0}),
        ];

        assert_eq!(extract_member_ids(&members), vec![3, 1, 2]);
    }

    #[test]
    fn test_extract_ids_skips_bad_values() {
        let members = vec![
            json!({"id": "abc"}),
            json!("not an object"),
            json!({"name": "no id"}),
            json!({"id": null, "user_id": 9}),
            json!({"id": -4}),
            json!({"id": 1.5}),
            json!({"id": " 8 "}),
        ];

        assert_eq!(extract_member_ids(&members), vec![9, 8]);
    }

    #[test]
    fn test_extract_ids_blank_alias_falls_through() {
        let members = vec![
            json!({"player_id": "", "id": 5}),
            json!({"player_id": "  ", "id": "abc", "user_id": 6}),
        ];

        assert_eq!(extract_member_ids(&members), vec![5, 6]);
    }

    #[test]
    fn test_member_id_rejects_out_of_range_floats() {
        assert_eq!(as_member_id(&json!(18446744073709551616.0)), None);
        assert_eq!(as_member_id(&json!(1e20)), None);
        assert_eq!(as_member_id(&json!(4096.0)), Some(4096));
    }
}
