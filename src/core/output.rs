use crate::domain::model::{
    Identifier, LegacyStatsMap, OutputFormat, StatEntry, StatsData, StatsDocument, StatsReport,
};
use crate::utils::error::Result;

pub const JS_GLOBAL: &str = "window.FFSCOUTER_DEFAULTS";

pub fn build_document(report: &StatsReport, format: OutputFormat, generated_at: i64) -> StatsDocument {
    let data = match format {
        OutputFormat::Records => StatsData::Records(report.entries.clone()),
        OutputFormat::Map => StatsData::Map(legacy_map(&report.entries)),
    };

    StatsDocument {
        faction_id: Identifier::parse(&report.roster.faction_id),
        faction_name: report.roster.faction_name.clone(),
        generated_at,
        data,
    }
}

/// Entries without a human-readable estimate have nothing to put in the map.
fn legacy_map(entries: &[StatEntry]) -> LegacyStatsMap {
    LegacyStatsMap(
        entries
            .iter()
            .filter_map(|e| {
                let human = e.bs_estimate_human.clone()?;
                Some((e.player_id.to_string(), human))
            })
            .collect(),
    )
}

/// Pretty JSON, or a script assigning it to `window.FFSCOUTER_DEFAULTS`
/// when the target is a `.js` file.
pub fn render_document(document: &StatsDocument, output_path: &str) -> Result<String> {
    let json = serde_json::to_string_pretty(document)?;

    if is_script_path(output_path) {
        Ok(format!(
            "// {} - generated by {}\n{} = {};\n",
            file_name(output_path),
            env!("CARGO_PKG_NAME"),
            JS_GLOBAL,
            json
        ))
    } else {
        Ok(json)
    }
}

pub fn is_script_path(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
}

fn file_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
