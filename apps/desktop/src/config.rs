use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context};
use client_core::transport::parse_base_url;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "tasks.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Flags that override every other layer.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then environment, then flags.
pub fn load_settings(overrides: &CliOverrides) -> anyhow::Result<Settings> {
    let mut settings = match overrides.config.as_deref() {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env(&mut settings, |key| std::env::var(key).ok());

    if let Some(v) = &overrides.base_url {
        settings.base_url = v.clone();
    }
    if let Some(v) = overrides.timeout_secs {
        settings.request_timeout_secs = v;
    }

    settings.base_url = normalize_base_url(&settings.base_url)?;
    if settings.request_timeout_secs == 0 {
        return Err(anyhow!("request timeout must be at least one second"));
    }
    Ok(settings)
}

fn read_config_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TASKS_API_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let url = parse_base_url(raw)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
