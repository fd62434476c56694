//! Persistent CLI configuration for the remote record host.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use synk_core::util::non_blank;
use synk_core::SyncSettings;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";

pub const REMOTE_URL_ENV: &str = "SYNK_REMOTE_URL";
pub const REMOTE_TOKEN_ENV: &str = "SYNK_REMOTE_TOKEN";

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl fmt::Debug for CliConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CliConfig")
            .field("remote_url", &self.remote_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("synk").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("failed to resolve config directory".to_string()))
}

impl CliConfig {
    pub fn load() -> Result<Self, CliError> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!("Failed to read config at {}: {error}", path.display()))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!("Failed to parse config at {}: {error}", path.display()))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                CliError::Config(format!(
                    "Failed to create config directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized).map_err(|error| {
            CliError::Config(format!("Failed to write config at {}: {error}", path.display()))
        })
    }

    /// Set the remote host, rejecting anything that is not an http(s) URL.
    pub fn set_remote(&mut self, url: &str, token: Option<String>) -> Result<(), CliError> {
        let base_url = SyncSettings::new(url)
            .remote_base_url()
            .ok()
            .flatten()
            .ok_or_else(|| {
                CliError::Config(format!(
                    "remote URL must include http:// or https:// (got '{}')",
                    url.trim()
                ))
            })?;
        self.remote_url = Some(base_url);
        self.auth_token = non_blank(token);
        Ok(())
    }

    /// Settings from this file, overridden by `SYNK_REMOTE_URL` and
    /// `SYNK_REMOTE_TOKEN`.
    pub fn sync_settings_from_env(&self) -> Result<SyncSettings, CliError> {
        self.sync_settings_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn sync_settings_from_lookup<F>(&self, lookup: F) -> Result<SyncSettings, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let remote_url =
            non_blank(lookup(REMOTE_URL_ENV)).or_else(|| self.remote_url.clone());
        let auth_token =
            non_blank(lookup(REMOTE_TOKEN_ENV)).or_else(|| self.auth_token.clone());

        let settings = SyncSettings {
            remote_url,
            ..SyncSettings::default()
        }
        .with_auth_token(auth_token);
        settings.remote_base_url()?;
        Ok(settings)
    }

    fn normalize(&mut self) {
        self.remote_url = non_blank(self.remote_url.clone());
        self.auth_token = non_blank(self.auth_token.clone());
    }
}
