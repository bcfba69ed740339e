use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::warn;

use crate::registry::ProviderId;

/// Per-provider connection settings as stored in the configuration file.
///
/// Every field is optional; absent values fall back to the registry
/// defaults at call time, so a freshly seeded file works without edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ProviderSettings {
    /// Settings pre-filled with the registry defaults and no credential,
    /// the shape written into a fresh configuration file
    pub fn seeded(id: ProviderId) -> Self {
        let defaults = id.defaults();
        Self {
            api_key: None,
            base_url: Some(defaults.base_url.to_string()),
            model: Some(defaults.model.to_string()),
        }
    }

    /// The configured credential, treating an empty string as absent
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Base URL override, or the registry default
    pub fn effective_base_url(&self, id: ProviderId) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(id.defaults().base_url)
    }

    /// Model override, or the registry default
    pub fn effective_model(&self, id: ProviderId) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.is_empty())
            .unwrap_or(id.defaults().model)
    }
}

/// Application configuration, persisted as `config.json`.
///
/// `workspace_path` belongs to the file service and is carried through
/// untouched; the chat core only consumes `llm_provider` and `providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub workspace_path: Option<String>,
    pub llm_provider: ProviderId,
    #[serde(default)]
    pub providers: HashMap<ProviderId, ProviderSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace_path: None,
            llm_provider: ProviderId::OpenAi,
            providers: ProviderId::ALL
                .into_iter()
                .map(|id| (id, ProviderSettings::seeded(id)))
                .collect(),
        }
    }
}

impl AppConfig {
    /// Settings for one provider; a missing map entry behaves like an
    /// all-default entry
    pub fn settings(&self, id: ProviderId) -> ProviderSettings {
        self.providers.get(&id).cloned().unwrap_or_default()
    }

    /// Settings for the currently selected provider
    pub fn selected_settings(&self) -> ProviderSettings {
        self.settings(self.llm_provider)
    }

    /// Loads the configuration file, falling back to defaults when the file
    /// is missing. A file that exists but does not parse also yields the
    /// defaults so a damaged config never blocks startup.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        match serde_json::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Writes the configuration back as pretty-printed JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents).await?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode config: {0}")]
    Json(#[from] serde_json::Error),
}
