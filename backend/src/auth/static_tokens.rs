//! Fixed token table.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;

use super::{AuthVerifier, Identity};
use crate::api::{Role, UserId};

/// Accepts a fixed set of tokens, each mapped to one identity.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `identity`.
    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromStr for StaticTokenVerifier {
    type Err = anyhow::Error;

    /// Parse `token=user-uuid[:role]` entries separated by commas.
    fn from_str(s: &str) -> Result<Self> {
        let mut verifier = Self::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, rest) = entry
                .split_once('=')
                .with_context(|| format!("static token entry {:?} has no '='", entry))?;
            let (user, role) = match rest.split_once(':') {
                Some((user, role)) => (user, Some(role.parse::<Role>().map_err(|e| anyhow!(e))?)),
                None => (rest, None),
            };
            let user_id: UserId = user
                .parse()
                .with_context(|| format!("static token entry {:?} has an invalid user id", entry))?;

            let identity = Identity {
                role,
                ..Identity::new(user_id)
            };
            verifier = verifier.with_token(token.trim(), identity);
        }
        Ok(verifier)
    }
}

#[async_trait]
impl AuthVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| anyhow!("unknown token"))
    }
}
