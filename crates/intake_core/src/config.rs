use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    bootstrap::{AutoStart, BootstrapPlan},
    gate::DEFAULT_GOAL_TOPIC,
    planner::{resolve_api_base, EndpointError, PLANNER_PORT},
};

pub const DEFAULT_SETTINGS_FILE: &str = "intake.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: Option<String>,
    pub page_url: Option<String>,
    pub goal_topic: String,
    pub api_key: Option<String>,
    pub connect_delay_ms: u64,
    pub start_delay_ms: u64,
    pub auto_start: AutoStart,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: None,
            page_url: None,
            goal_topic: DEFAULT_GOAL_TOPIC.into(),
            api_key: None,
            connect_delay_ms: 50,
            start_delay_ms: 120,
            auto_start: AutoStart::Off,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base: Option<String>,
    page_url: Option<String>,
    goal_topic: Option<String>,
    api_key: Option<String>,
    connect_delay_ms: Option<u64>,
    start_delay_ms: Option<u64>,
    auto_start: Option<AutoStart>,
}

impl Settings {
    /// Explicit base first, then one derived from the page URL, then the
    /// planner on localhost.
    pub fn resolved_api_base(&self) -> Result<String, EndpointError> {
        if let Some(base) = non_empty(self.api_base.as_deref()) {
            return Ok(base.trim_end_matches('/').to_string());
        }
        if let Some(page) = non_empty(self.page_url.as_deref()) {
            return resolve_api_base(page, PLANNER_PORT);
        }
        Ok(format!("http://127.0.0.1:{PLANNER_PORT}"))
    }

    pub fn bootstrap_plan(&self) -> BootstrapPlan {
        BootstrapPlan {
            connect_delay: Duration::from_millis(self.connect_delay_ms),
            start_delay: Duration::from_millis(self.start_delay_ms),
            auto_start: self.auto_start,
        }
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.api_base {
            self.api_base = Some(v);
        }
        if let Some(v) = file_cfg.page_url {
            self.page_url = Some(v);
        }
        if let Some(v) = file_cfg.goal_topic {
            self.goal_topic = v;
        }
        if let Some(v) = file_cfg.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = file_cfg.connect_delay_ms {
            self.connect_delay_ms = v;
        }
        if let Some(v) = file_cfg.start_delay_ms {
            self.start_delay_ms = v;
        }
        if let Some(v) = file_cfg.auto_start {
            self.auto_start = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("API_BASE") {
            self.api_base = Some(v);
        }
        if let Some(v) = lookup("APP__API_BASE") {
            self.api_base = Some(v);
        }

        if let Some(v) = lookup("PAGE_URL") {
            self.page_url = Some(v);
        }

        if let Some(v) = lookup("GOAL_TOPIC") {
            self.goal_topic = v;
        }
        if let Some(v) = lookup("APP__GOAL_TOPIC") {
            self.goal_topic = v;
        }

        if let Some(v) = lookup("API_KEY") {
            self.api_key = Some(v);
        }

        if let Some(v) = lookup("APP__CONNECT_DELAY_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.connect_delay_ms = parsed;
            }
        }
        if let Some(v) = lookup("APP__START_DELAY_MS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.start_delay_ms = parsed;
            }
        }
        if let Some(v) = lookup("APP__AUTO_START") {
            if let Ok(parsed) = v.parse::<AutoStart>() {
                self.auto_start = parsed;
            }
        }
    }
}

/// Defaults, then the settings file, then the process environment.
///
/// A missing file is only an error when the path was given explicitly.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Settings, SettingsError> {
    let mut settings = Settings::default();

    let (file_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    match fs::read_to_string(&file_path) {
        Ok(raw) => {
            let file_cfg =
                toml::from_str::<FileSettings>(&raw).map_err(|source| SettingsError::Parse {
                    path: file_path.clone(),
                    source,
                })?;
            settings.apply_file(file_cfg);
        }
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SettingsError::Read {
                path: file_path,
                source,
            })
        }
    }

    settings.apply_env(lookup);
    Ok(settings)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
