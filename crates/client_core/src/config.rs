use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "cars.toml";
pub const DEFAULT_SERVICE_URL: &str = "https://bootstrap-demo4-zaginureeq-uw.a.run.app";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid service url `{url}`: {reason}")]
    InvalidServiceUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub service_url: String,
    pub service_path: String,
    pub realtime_events: bool,
    pub events_path: String,
    pub request_timeout_secs: u64,
    pub event_buffer: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            service_path: "cars".into(),
            realtime_events: false,
            events_path: "cars/events".into(),
            request_timeout_secs: 30,
            event_buffer: 256,
        }
    }
}

/// On-disk form of the settings; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    service_url: Option<String>,
    service_path: Option<String>,
    realtime_events: Option<bool>,
    events_path: Option<String>,
    request_timeout_secs: Option<u64>,
    event_buffer: Option<usize>,
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Collection endpoint, e.g. `https://host/cars`.
    pub fn collection_url(&self) -> String {
        join_url(&self.service_url, &self.service_path)
    }

    /// Realtime feed endpoint with the scheme switched to `ws`/`wss`.
    pub fn events_url(&self) -> Result<String, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidServiceUrl {
            url: self.service_url.clone(),
            reason,
        };
        let mut url = Url::parse(self.service_url.trim()).map_err(|err| invalid(err.to_string()))?;
        let ws_scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            _ => return Err(invalid("service_url must start with http:// or https://".into())),
        };
        url.set_scheme(ws_scheme)
            .map_err(|()| invalid(format!("cannot switch scheme to {ws_scheme}")))?;
        Ok(join_url(url.as_str().trim_end_matches('/'), &self.events_path))
    }

    fn merge_file(&mut self, file: FileSettings) {
        if let Some(v) = file.service_url {
            self.service_url = v;
        }
        if let Some(v) = file.service_path {
            self.service_path = v;
        }
        if let Some(v) = file.realtime_events {
            self.realtime_events = v;
        }
        if let Some(v) = file.events_path {
            self.events_path = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.event_buffer {
            self.event_buffer = v;
        }
    }

    /// Applies `CARS_SERVICE_URL` and `APP__*` overrides. `lookup` is the
    /// environment accessor so tests can supply their own.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CARS_SERVICE_URL") {
            self.service_url = v;
        }
        if let Some(v) = lookup("APP__SERVICE_URL") {
            self.service_url = v;
        }
        if let Some(v) = lookup("APP__SERVICE_PATH") {
            self.service_path = v;
        }
        if let Some(v) = lookup("APP__REALTIME_EVENTS") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.realtime_events = true,
                "0" | "false" | "no" | "off" => self.realtime_events = false,
                other => tracing::warn!(value = other, "ignoring unrecognized APP__REALTIME_EVENTS"),
            }
        }
        if let Some(v) = lookup("APP__EVENTS_PATH") {
            self.events_path = v;
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
        if let Some(v) = lookup("APP__EVENT_BUFFER") {
            if let Ok(parsed) = v.parse::<usize>() {
                self.event_buffer = parsed.max(1);
            }
        }
    }

    /// Checks the service url and strips trailing slashes from it and the
    /// configured paths.
    pub fn normalized(mut self) -> Result<Self, SettingsError> {
        let raw = self.service_url.trim();
        let parsed = Url::parse(raw).map_err(|err| SettingsError::InvalidServiceUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidServiceUrl {
                url: raw.to_string(),
                reason: "service_url must start with http:// or https://".into(),
            });
        }
        self.service_url = raw.trim_end_matches('/').to_string();
        self.service_path = self.service_path.trim_matches('/').to_string();
        self.events_path = self.events_path.trim_matches('/').to_string();
        self.event_buffer = self.event_buffer.max(1);
        Ok(self)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Loads settings from `path` (or `cars.toml` in the working directory when
/// present), then the process environment.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings, SettingsError> {
    load_settings_with_env(path, |name| std::env::var(name).ok())
}

fn load_settings_with_env(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_SETTINGS_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg =
                toml::from_str::<FileSettings>(&raw).map_err(|source| SettingsError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;
            settings.merge_file(file_cfg);
        }
        Err(source) if required || source.kind() != std::io::ErrorKind::NotFound => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                source,
            });
        }
        Err(_) => {}
    }

    settings.apply_env_overrides(lookup);
    settings.normalized()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
