//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::db::repository::FullRepository;
use crate::generation::TextGenerator;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for all persistence
    pub repository: Arc<dyn FullRepository>,
    /// Checks bearer credentials
    pub auth: Arc<dyn AuthVerifier>,
    /// Labels study blocks for generated plans
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn FullRepository>,
        auth: Arc<dyn AuthVerifier>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            repository,
            auth,
            generator,
        }
    }
}
