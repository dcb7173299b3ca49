//! Repository configuration file and environment support.
//!
//! A `repository.toml` selects the backend and carries the hosted backend's
//! connection settings:
//!
//! ```toml
//! [repository]
//! type = "rest"
//!
//! [rest]
//! base_url = "https://project.example.co"
//! api_key = "service-key"
//! timeout_secs = 15
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project URL, without a trailing slash
    pub base_url: String,
    /// Service key sent as both `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `BACKEND_URL` (required): Project URL
    /// - `BACKEND_SERVICE_KEY` (required): Service key
    /// - `BACKEND_TIMEOUT_SECS` (optional, default: 30): Request timeout
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or the timeout is not a number.
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("BACKEND_URL")
            .map_err(|_| "BACKEND_URL environment variable not set".to_string())?;
        let api_key = env::var("BACKEND_SERVICE_KEY")
            .map_err(|_| "BACKEND_SERVICE_KEY environment variable not set".to_string())?;
        let timeout_secs = match env::var("BACKEND_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .map_err(|_| "BACKEND_TIMEOUT_SECS must be a whole number of seconds".to_string())?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            timeout_secs,
            ..Self::new(base_url, api_key)
        })
    }
}

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub rest: RestSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Hosted backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RestSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        match Self::default_path() {
            Some(path) => Self::from_file(&path),
            None => Err(RepositoryError::configuration(
                "No repository.toml found in standard locations",
            )),
        }
    }

    /// First existing `repository.toml` among the standard locations.
    pub fn default_path() -> Option<PathBuf> {
        [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Hosted backend settings, when this configuration selects it.
    ///
    /// # Returns
    /// * `Ok(None)` for a local repository
    /// * `Ok(Some(RestConfig))` for a complete `[rest]` section
    /// * `Err(RepositoryError)` if the type is unknown or `[rest]` is incomplete
    pub fn to_rest_config(&self) -> Result<Option<RestConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Rest {
            return Ok(None);
        }

        if self.rest.base_url.is_empty() || self.rest.api_key.is_empty() {
            return Err(RepositoryError::configuration(
                "Rest repository requires 'rest.base_url' and 'rest.api_key' settings",
            ));
        }

        Ok(Some(RestConfig {
            timeout_secs: self.rest.timeout_secs,
            ..RestConfig::new(&self.rest.base_url, &self.rest.api_key)
        }))
    }
}
