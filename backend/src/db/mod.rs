//! Persistence layer for plans, profiles and study records.
//!
//! Storage goes through the repository traits so that backends can be
//! swapped without touching the services or the HTTP layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http::handlers)                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Services (crate::services) - plan generation, roster,  │
//! │  progress summaries                                     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - one per entity       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │ LocalRepository │ RestRepository │
//!     │  (in-memory)    │ (hosted tables)│
//!     └──────────────────────────────────┘
//! ```
//!
//! # Feature flags
//! - `local-repo`: in-memory backend (default)
//! - `rest-repo`: hosted backend over its table API

#[cfg(not(any(feature = "rest-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use checksum::{calculate_checksum, profile_checksum};
pub use repo_config::{RepositoryConfig, RestConfig};

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "rest-repo")]
pub use repositories::RestRepository;
pub use repository::{
    BookRepository, ErrorContext, FullRepository, InviteRepository, PlanRepository,
    ProfileRepository, RecordRepository, RepositoryError, RepositoryResult, SourceRepository,
    TopicRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton from the environment.
///
/// A `repository.toml` in the standard locations takes precedence over
/// `REPOSITORY_TYPE`; without either the in-memory backend is used.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = match RepositoryConfig::default_path() {
        Some(path) => {
            info!(path = %path.display(), "Loading repository configuration");
            RepositoryFactory::from_config_file(&path)
        }
        None => RepositoryFactory::from_env(),
    }
    .context("Failed to initialize repository")?;

    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
