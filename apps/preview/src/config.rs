use std::{collections::HashMap, fs};

use chrono::FixedOffset;

pub const SETTINGS_FILE: &str = "preview.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    pub server_url: String,
    pub user_id: String,
    pub share_url: String,
    pub utc_offset_hours: i32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8443".into(),
            user_id: "default".into(),
            share_url: String::new(),
            utc_offset_hours: 9,
        }
    }
}

impl PreviewSettings {
    /// Falls back to KST when the configured hours are out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(client_core::engine::korea_standard_time)
    }
}

pub fn load_settings() -> PreviewSettings {
    let mut settings = PreviewSettings::default();
    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_settings(&mut settings, &raw);
    }
    apply_env_settings(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Overlays keys from a flat `preview.toml`. Unparseable files are ignored.
pub fn apply_file_settings(settings: &mut PreviewSettings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("user_id").and_then(toml::Value::as_str) {
        settings.user_id = v.to_string();
    }
    if let Some(v) = file_cfg.get("share_url").and_then(toml::Value::as_str) {
        settings.share_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("utc_offset_hours")
        .and_then(toml::Value::as_integer)
        .and_then(|v| i32::try_from(v).ok())
    {
        settings.utc_offset_hours = v;
    }
}

/// Environment wins over the file; `APP__*` names win over the short ones.
pub fn apply_env_settings(settings: &mut PreviewSettings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["SERVER_URL", "APP__SERVER_URL"] {
        if let Some(v) = lookup(key) {
            settings.server_url = v;
        }
    }
    for key in ["USER_ID", "APP__USER_ID"] {
        if let Some(v) = lookup(key) {
            settings.user_id = v;
        }
    }
    if let Some(v) = lookup("APP__SHARE_URL") {
        settings.share_url = v;
    }
    if let Some(v) = lookup("APP__UTC_OFFSET_HOURS").and_then(|v| v.trim().parse::<i32>().ok()) {
        settings.utc_offset_hours = v;
    }
}
