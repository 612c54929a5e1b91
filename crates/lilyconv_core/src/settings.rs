//! Grouped key/value settings, injected into the dialogs.

use std::collections::BTreeMap;

pub const CONVERT_GROUP: &str = "convert_ly";
pub const COPY_MESSAGES_KEY: &str = "copy_messages";
pub const LILYPOND_GROUP: &str = "lilypond_settings";
pub const NO_TRANSLATION_KEY: &str = "no_translation";
pub const LANGUAGE_KEY: &str = "language";
/// Stored language value meaning "let the tool decide".
pub const DEFAULT_LANGUAGE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
}

pub trait SettingsStore {
    fn value(&self, group: &str, key: &str) -> Option<SettingValue>;

    fn set_value(&mut self, group: &str, key: &str, value: SettingValue);

    /// Boolean setting; text values `"true"`/`"false"` are accepted too.
    fn bool_value(&self, group: &str, key: &str, default: bool) -> bool {
        match self.value(group, key) {
            Some(SettingValue::Bool(value)) => value,
            Some(SettingValue::Text(text)) => match text.trim() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            None => default,
        }
    }

    fn text_value(&self, group: &str, key: &str, default: &str) -> String {
        match self.value(group, key) {
            Some(SettingValue::Text(text)) => text,
            Some(SettingValue::Bool(value)) => value.to_string(),
            None => default.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemorySettings {
    groups: BTreeMap<String, BTreeMap<String, SettingValue>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: BTreeMap<String, BTreeMap<String, SettingValue>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &BTreeMap<String, BTreeMap<String, SettingValue>> {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeMap::is_empty)
    }
}

impl SettingsStore for MemorySettings {
    fn value(&self, group: &str, key: &str) -> Option<SettingValue> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn set_value(&mut self, group: &str, key: &str, value: SettingValue) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySettings, SettingValue, SettingsStore};

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let store = MemorySettings::new();
        assert!(store.bool_value("g", "k", true));
        assert_eq!(store.text_value("g", "k", "default"), "default");
    }

    #[test]
    fn groups_keep_keys_apart() {
        let mut store = MemorySettings::new();
        store.set_value("a", "flag", SettingValue::Bool(true));
        store.set_value("b", "flag", SettingValue::Bool(false));
        assert!(store.bool_value("a", "flag", false));
        assert!(!store.bool_value("b", "flag", true));
    }

    #[test]
    fn textual_booleans_are_understood() {
        let mut store = MemorySettings::new();
        store.set_value("g", "yes", SettingValue::Text("true".into()));
        store.set_value("g", "junk", SettingValue::Text("maybe".into()));
        assert!(store.bool_value("g", "yes", false));
        assert!(!store.bool_value("g", "junk", false));
    }
}
