//! Credential verification.
//!
//! Authentication itself is delegated: the server only checks a bearer
//! credential against an [`AuthVerifier`] and receives the user's identity.
//! Two verifiers exist:
//!
//! - [`RemoteAuthVerifier`]: asks the hosted auth service who the token belongs to
//! - [`StaticTokenVerifier`]: fixed token table for local development and tests
//!
//! [`AuthConfig::from_env`] picks one from the environment.

pub mod remote;
pub mod static_tokens;

pub use remote::RemoteAuthVerifier;
pub use static_tokens::StaticTokenVerifier;

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::env;
use std::sync::Arc;

use crate::api::{Role, UserId};

/// Who a verified credential belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Role claimed by the credential. The profile row is authoritative;
    /// this is only consulted when the user has no profile yet.
    pub role: Option<Role>,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            role: None,
        }
    }
}

/// The caller of one request, resolved from its credential and profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: Role,
}

impl RequestContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            email: None,
            role,
        }
    }

    /// Combine a verified identity with the role stored on the user's
    /// profile. Without a profile the credential's claim is used, and
    /// without a claim the caller is a student.
    pub fn resolve(identity: Identity, profile_role: Option<Role>) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: profile_role.or(identity.role).unwrap_or_default(),
        }
    }
}

/// Verifies bearer credentials.
///
/// Any error means the credential is not accepted; callers answer 401.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity>;
}

/// Auth settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// `AUTH_URL` + `AUTH_API_KEY`
    Remote { url: String, api_key: String },
    /// `AUTH_STATIC_TOKENS`, as `token=user-uuid[:role],...`
    Static(String),
}

impl AuthConfig {
    /// Read the auth settings.
    ///
    /// # Errors
    /// Returns an error when neither the remote pair nor a static token
    /// table is configured.
    pub fn from_env() -> Result<Self> {
        if let (Ok(url), Ok(api_key)) = (env::var("AUTH_URL"), env::var("AUTH_API_KEY")) {
            return Ok(Self::Remote { url, api_key });
        }
        match env::var("AUTH_STATIC_TOKENS") {
            Ok(table) => Ok(Self::Static(table)),
            Err(_) => bail!("Set AUTH_URL and AUTH_API_KEY, or AUTH_STATIC_TOKENS"),
        }
    }

    /// Build the verifier these settings describe.
    pub fn build(&self) -> Result<Arc<dyn AuthVerifier>> {
        Ok(match self {
            Self::Remote { url, api_key } => Arc::new(RemoteAuthVerifier::new(url, api_key)?),
            Self::Static(table) => Arc::new(table.parse::<StaticTokenVerifier>()?),
        })
    }
}

/// Extract the credential from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
