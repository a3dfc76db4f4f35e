use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const TORN_KEY_VARS: [&str; 3] = ["TORN_API_KEY", "API_KEY", "apikey"];
pub const FFSCOUTER_KEY_VARS: [&str; 3] = ["FFSCOUTER_API_KEY", "FF_API_KEY", "ffapikey"];
pub const FACTION_ID_VAR: &str = "FACTION_ID";

/// Variables visible to a run: the `.env` file overlaid by the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load the `.env` file (explicit path, else `./.env`, else `../.env`)
    /// and then the process environment on top of it.
    pub fn load(explicit: Option<&Path>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut source = Self::default();

        if let Some(path) = locate_env_file(explicit, &cwd) {
            source.merge_env_file(&path);
        }
        source.overlay(std::env::vars());
        source
    }

    /// Read `KEY=value` pairs. Blank values and malformed lines are skipped.
    pub fn merge_env_file(&mut self, path: &Path) {
        let iter = match dotenv::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) => {
                tracing::warn!("⚠️ Could not read {}: {}", path.display(), e);
                return;
            }
        };

        let mut loaded = 0;
        for item in iter {
            match item {
                Ok((key, value)) => {
                    let key = key.trim().to_string();
                    let value = value.trim().to_string();
                    if key.is_empty() || value.is_empty() {
                        continue;
                    }
                    self.vars.insert(key, value);
                    loaded += 1;
                }
                Err(e) => tracing::warn!("⚠️ Skipping line in {}: {}", path.display(), e),
            }
        }
        tracing::debug!("Loaded {} variables from {}", loaded, path.display());
    }

    /// Later values win.
    pub fn overlay<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.vars.extend(pairs);
    }

    /// First non-empty value among `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.vars.get(*name))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.first_of(&[name])
    }
}

pub fn locate_env_file(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("⚠️ Env file {} not found; using the environment only", path.display());
        return None;
    }

    let local = cwd.join(".env");
    if local.exists() {
        return Some(local);
    }

    cwd.parent()
        .map(|parent| parent.join(".env"))
        .filter(|p| p.exists())
}
