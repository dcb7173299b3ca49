//! Repository factory for dependency injection.
//!
//! Chooses between the in-memory and the hosted backend at runtime, from
//! environment variables or a `repository.toml`.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::{RepositoryConfig, RestConfig};
use super::repositories::LocalRepository;
#[cfg(feature = "rest-repo")]
use super::repositories::RestRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Hosted backend reached over its table API
    Rest,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("rest", "hosted", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" | "hosted" => Ok(Self::Rest),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Rest when
    /// `BACKEND_URL` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("BACKEND_URL").is_ok() {
            Self::Rest
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use study_planner::db::{RepositoryFactory, RepositoryType, RestConfig};
///
/// let config = RestConfig::from_env()?;
/// let hosted = RepositoryFactory::create(RepositoryType::Rest, Some(&config))?;
/// let local = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `rest_config` - Hosted backend settings (required for Rest)
    pub fn create(
        repo_type: RepositoryType,
        rest_config: Option<&RestConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Rest => {
                let config = rest_config.ok_or_else(|| {
                    RepositoryError::configuration("Rest repository requires RestConfig")
                })?;
                Self::create_rest(config)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a repository for the hosted backend.
    #[cfg(feature = "rest-repo")]
    pub fn create_rest(config: &RestConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = RestRepository::new(config.clone())?;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "rest-repo"))]
    pub fn create_rest(config: &RestConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let _ = config;
        Err(RepositoryError::configuration(
            "Rest repository feature not enabled",
        ))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryType::from_env`] and [`RestConfig::from_env`].
    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_env()?.build()
    }

    /// Create repository from a TOML configuration file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_config_file(config_path)?.build()
    }

    /// Create repository from the first `repository.toml` found in the
    /// standard locations.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_default_config()?.build()
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```ignore
/// use study_planner::db::{RepositoryBuilder, RepositoryType};
///
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .build()?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    rest_config: Option<RestConfig>,
}

impl RepositoryBuilder {
    /// Create a new repository builder. The type defaults to
    /// [`RepositoryType::from_env`].
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            rest_config: None,
        }
    }

    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    pub fn rest_config(mut self, config: RestConfig) -> Self {
        self.rest_config = Some(config);
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::Rest {
            self.rest_config = Some(RestConfig::from_env().map_err(RepositoryError::configuration)?);
        }
        Ok(self)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with loaded configuration
    /// * `Err(RepositoryError)` - If file cannot be read or parsed
    pub fn from_config_file<P: AsRef<Path>>(
        self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;
        self.from_repository_config(&repo_config)
    }

    /// Load configuration from default location.
    pub fn from_default_config(self) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_default_location()?;
        self.from_repository_config(&repo_config)
    }

    /// Apply an already loaded configuration.
    pub fn from_repository_config(
        mut self,
        repo_config: &RepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        self.repo_type = repo_config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.rest_config = repo_config.to_rest_config()?;
        Ok(self)
    }

    /// Build the repository instance.
    pub fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.rest_config.as_ref())
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
