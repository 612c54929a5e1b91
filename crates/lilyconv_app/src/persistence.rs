use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lilyconv_core::{MemorySettings, SettingValue};
use lilyconv_engine::{write_text_file, PersistError};
use lilyconv_logging::{lily_info, lily_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILENAME: &str = "settings.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no configuration directory is available on this system")]
    NoConfigDir,
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write settings: {0}")]
    Write(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum PersistedValue {
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSettings {
    groups: BTreeMap<String, BTreeMap<String, PersistedValue>>,
}

/// `settings.ron` in the platform configuration directory.
pub(crate) fn default_settings_path() -> Result<PathBuf, SettingsError> {
    ProjectDirs::from("org", "lilyconv", "lilyconv")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
        .ok_or(SettingsError::NoConfigDir)
}

/// Grouped settings backed by a RON file.
#[derive(Debug)]
pub(crate) struct SettingsFile {
    path: PathBuf,
    settings: MemorySettings,
}

impl SettingsFile {
    /// A missing, unreadable or corrupt file yields empty settings, so every
    /// value falls back to its default.
    pub(crate) fn load(path: PathBuf) -> Self {
        let settings = match fs::read_to_string(&path) {
            Ok(content) => parse_settings(&path, &content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => MemorySettings::new(),
            Err(err) => {
                lily_warn!("Failed to read settings from {:?}: {}", path, err);
                MemorySettings::new()
            }
        };
        Self { path, settings }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut MemorySettings {
        &mut self.settings
    }

    pub(crate) fn save(&self) -> Result<(), SettingsError> {
        let state = PersistedSettings {
            groups: self
                .settings
                .groups()
                .iter()
                .map(|(group, values)| {
                    let values = values
                        .iter()
                        .map(|(key, value)| (key.clone(), to_persisted(value)))
                        .collect();
                    (group.clone(), values)
                })
                .collect(),
        };
        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())?;
        write_text_file(&self.path, &content)?;
        lily_info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

fn parse_settings(path: &Path, content: &str) -> MemorySettings {
    let state: PersistedSettings = match ron::from_str(content) {
        Ok(state) => state,
        Err(err) => {
            lily_warn!("Failed to parse settings from {:?}: {}", path, err);
            return MemorySettings::new();
        }
    };
    let groups = state
        .groups
        .into_iter()
        .map(|(group, values)| {
            let values = values
                .into_iter()
                .map(|(key, value)| (key, from_persisted(value)))
                .collect();
            (group, values)
        })
        .collect();
    lily_info!("Loaded settings from {:?}", path);
    MemorySettings::from_groups(groups)
}

fn to_persisted(value: &SettingValue) -> PersistedValue {
    match value {
        SettingValue::Bool(value) => PersistedValue::Bool(*value),
        SettingValue::Text(value) => PersistedValue::Text(value.clone()),
    }
}

fn from_persisted(value: PersistedValue) -> SettingValue {
    match value {
        PersistedValue::Bool(value) => SettingValue::Bool(value),
        PersistedValue::Text(value) => SettingValue::Text(value),
    }
}
