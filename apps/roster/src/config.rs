use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use client_core::DEFAULT_BASE_URL;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `path` if it exists, then environment overrides.
///
/// A missing file is fine; an unreadable or malformed one is an error.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file {}", path.display()))
        }
    };
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("failed to parse settings file {}", path.display()))
}

pub fn settings_from_sources(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, toml::de::Error> {
    let mut settings = match file_contents {
        Some(raw) => toml::from_str::<Settings>(raw)?,
        None => Settings::default(),
    };

    if let Some(v) = env("ROSTER_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = settings_from_sources(None, env_from(&[])).expect("defaults");
        assert_eq!(settings.base_url, "http://localhost:8080/api/employees");
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn file_values_fill_missing_keys_with_defaults() {
        let settings = settings_from_sources(
            Some(r#"base_url = "https://hr.example.com/api/employees""#),
            env_from(&[]),
        )
        .expect("valid file");
        assert_eq!(settings.base_url, "https://hr.example.com/api/employees");
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn environment_overrides_file_and_app_prefix_wins() {
        let settings = settings_from_sources(
            Some("base_url = \"http://file\"\nlog_filter = \"warn\""),
            env_from(&[
                ("ROSTER_BASE_URL", "http://roster-env"),
                ("APP__BASE_URL", "http://app-env"),
                ("APP__LOG_FILTER", "debug"),
            ]),
        )
        .expect("valid file");
        assert_eq!(settings.base_url, "http://app-env");
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn malformed_file_is_rejected() {
        let result = settings_from_sources(Some("base_url = ["), env_from(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_on_disk_names_the_path() {
        let path = std::env::temp_dir().join(format!("roster-bad-{}.toml", std::process::id()));
        fs::write(&path, "log_filter = 3").expect("write temp settings");

        let err = load_settings(&path).expect_err("malformed settings");
        let _ = fs::remove_file(&path);

        let message = format!("{err:#}");
        assert!(message.contains("failed to parse settings file"));
        assert!(message.contains(&path.display().to_string()));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("roster-does-not-exist.toml");
        assert!(load_settings(&path).is_ok());
    }
}
