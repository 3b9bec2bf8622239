//! Browser-style key/value preferences. Only the theme flag lives here today.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::utils::sync::{read, write};

pub const PREFERENCES_FILE: &str = "preferences.json";
pub const THEME_STORAGE_KEY: &str = "agency-dashboard-theme";
pub const DEFAULT_THEME: Theme = Theme::Classic;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Classic,
    Neon,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Neon => "neon",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "classic" => Some(Theme::Classic),
            "neon" => Some(Theme::Neon),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Classic => Theme::Neon,
            Theme::Neon => Theme::Classic,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        DEFAULT_THEME
    }
}

pub struct PreferenceStore {
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
    data: RwLock<BTreeMap<String, String>>,
}

impl PreferenceStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable preferences at {}: {err}",
                    path.display()
                );
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        read(&self.data).get(key).cloned()
    }

    /// Writes through to disk on every change.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = write(&self.data);
        guard.insert(key.to_string(), value.to_string());
        self.persist(&guard)
    }

    pub fn theme(&self) -> Theme {
        match self.get(THEME_STORAGE_KEY) {
            Some(raw) => Theme::parse(&raw).unwrap_or_else(|| {
                warn!("Unknown theme '{raw}' in preferences, using {}", DEFAULT_THEME.as_str());
                DEFAULT_THEME
            }),
            None => DEFAULT_THEME,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME_STORAGE_KEY, theme.as_str())
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write preferences to {}", path.display()))
    }
}

impl PreferenceStore {
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = fs::read_to_string(path)?;
        let data: BTreeMap<String, String> = serde_json::from_str(&contents)?;
        *write(&self.data) = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default_theme() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join(PREFERENCES_FILE)).unwrap();
        assert_eq!(store.theme(), DEFAULT_THEME);
    }

    #[test]
    fn theme_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        PreferenceStore::new(path.clone())
            .unwrap()
            .set_theme(Theme::Neon)
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(THEME_STORAGE_KEY));
        assert_eq!(PreferenceStore::new(path).unwrap().theme(), Theme::Neon);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        fs::write(&path, "{not json").unwrap();
        let store = PreferenceStore::new(path).unwrap();
        assert_eq!(store.theme(), DEFAULT_THEME);
    }

    #[test]
    fn unknown_theme_value_falls_back() {
        let store = PreferenceStore::in_memory();
        store.set(THEME_STORAGE_KEY, "sepia").unwrap();
        assert_eq!(store.theme(), DEFAULT_THEME);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        let store = PreferenceStore::new(path.clone()).unwrap();
        fs::write(&path, format!("{{\"{THEME_STORAGE_KEY}\":\"neon\"}}")).unwrap();
        store.reload().unwrap();
        assert_eq!(store.theme(), Theme::Neon);
    }
}
