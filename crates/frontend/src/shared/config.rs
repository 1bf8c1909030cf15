use crate::sync::scroll_reveal::DEFAULT_SCROLL_DURATION_MS;
use serde::{Deserialize, Serialize};

/// How failed operations are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Blocking `window.alert` with the server's message.
    #[default]
    Alert,
    /// Dismissible banner rendered by `NoticeBanner`.
    Notice,
    /// Console only.
    Log,
}

/// Markup conventions and behavior knobs of the sync engine.
///
/// Every field has a default, so a host only passes what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub list_class: String,
    pub item_class: String,
    pub base_action_attr: String,
    pub id_attr: String,
    /// Read from `<head>`; parent id used when the trigger is outside any item.
    pub page_parent_attr: String,
    pub action_attr: String,
    pub key_attr: String,
    pub key_param_attr: String,
    pub href_attr: String,
    pub unsaved_class: String,
    pub added_class: String,
    pub scroll_duration_ms: u32,
    pub report: ReportMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            list_class: "editable-list".to_string(),
            item_class: "editable-list-item".to_string(),
            base_action_attr: "data-base-action".to_string(),
            id_attr: "data-id".to_string(),
            page_parent_attr: "data-parent-id".to_string(),
            action_attr: "data-action".to_string(),
            key_attr: "data-key".to_string(),
            key_param_attr: "data-key-param".to_string(),
            href_attr: "data-href".to_string(),
            unsaved_class: "unsaved".to_string(),
            added_class: "added".to_string(),
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            report: ReportMode::default(),
        }
    }
}

impl SyncConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
