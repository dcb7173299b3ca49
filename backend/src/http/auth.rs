//! Request-scoped caller extraction.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use tracing::{debug, warn};

use super::error::AppError;
use super::state::AppState;
use crate::auth::{bearer_token, RequestContext};
use crate::db::repository::ProfileRepository;

/// Resolves the caller before the handler runs: bearer credential, then the
/// verifier, then the caller's profile for the role.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer credential".to_string()))?;

        let identity = state.auth.verify(token).await.map_err(|e| {
            warn!(error = %format!("{:#}", e), "Rejected credential");
            AppError::Unauthorized("Invalid or expired credential".to_string())
        })?;

        let profile_role = state
            .repository
            .get_profile(identity.user_id)
            .await?
            .map(|p| p.role);
        let ctx = RequestContext::resolve(identity, profile_role);
        debug!(user_id = %ctx.user_id, role = ?ctx.role, "Authenticated request");
        Ok(ctx)
    }
}
