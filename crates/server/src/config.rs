use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "bouncer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub environment: String,
    pub debug: bool,
    pub roster_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            environment: "dev".into(),
            debug: true,
            roster_path: None,
        }
    }
}

impl Settings {
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    /// `RUST_LOG` wins when set; otherwise the filter follows `debug`.
    pub fn log_directives(&self, rust_log: Option<String>) -> String {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .unwrap_or_else(|| self.log_filter().to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    environment: Option<String>,
    debug: Option<bool>,
    roster_path: Option<PathBuf>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it exists, then environment variables.
/// A settings file that exists but cannot be read or parsed is an error.
pub(crate) fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid settings file {}", path.display()))?;
            if let Some(v) = file_cfg.bind_addr {
                settings.server_bind = v;
            }
            if let Some(v) = file_cfg.environment {
                settings.environment = v;
            }
            if let Some(v) = file_cfg.debug {
                settings.debug = v;
            }
            if let Some(v) = file_cfg.roster_path {
                settings.roster_path = Some(v);
            }
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read settings file {}", path.display()));
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__ENVIRONMENT") {
        settings.environment = v;
    }

    if let Some(v) = env("APP__DEBUG") {
        if let Some(parsed) = parse_flag(&v) {
            settings.debug = parsed;
        }
    }

    if let Some(v) = env("APP__ROSTER_PATH") {
        let v = v.trim();
        settings.roster_path = (!v.is_empty()).then(|| PathBuf::from(v));
    }

    Ok(settings)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
