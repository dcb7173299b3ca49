//! Verification against the hosted auth service.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{AuthVerifier, Identity};
use crate::api::{Role, UserId};

const VERIFY_TIMEOUT_SECS: u64 = 10;

/// Asks `GET {url}/auth/v1/user` who a bearer token belongs to.
#[derive(Debug, Clone)]
pub struct RemoteAuthVerifier {
    client: Client,
    user_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

impl RemoteAuthVerifier {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

fn claimed_role(metadata: &AppMetadata) -> Option<Role> {
    metadata.role.as_deref()?.parse().ok()
}

#[async_trait]
impl AuthVerifier for RemoteAuthVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .context("Auth service unreachable")?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Auth service rejected credential");
            bail!("credential rejected ({})", status);
        }

        let user: UserResponse = response
            .json()
            .await
            .context("Unexpected auth service response")?;

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            role: claimed_role(&user.app_metadata),
        })
    }
}
