//! Client settings loaded from an optional YAML file
//!
//! Settings only tune the transport and the task query. Credentials never live
//! here; they are entered for each run and kept in memory.

use crate::errors::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Number of task rows requested per listing.
pub const DEFAULT_TASK_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_task_limit")]
    pub task_limit: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("odoo-timer/{}", env!("CARGO_PKG_VERSION"))
}

fn default_task_limit() -> u32 {
    DEFAULT_TASK_LIMIT
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            task_limit: default_task_limit(),
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.task_limit == 0 {
            return Err(SettingsError::Invalid(
                "task_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, SettingsError> {
        // An empty document means "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: ClientSettings =
            serde_yaml::from_str(content).map_err(|e| SettingsError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SettingsError::Io {
                path: display.clone(),
                message: e.to_string(),
            })?;

        let settings = Self::from_yaml_str(&content, &display)?;
        log::debug!("Loaded client settings from {}: {:?}", display, settings);
        Ok(settings)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path).await,
            None => Ok(Self::default()),
        }
    }
}
