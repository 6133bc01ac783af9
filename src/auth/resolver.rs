use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::AuthError;
use super::store::TokenStore;

/// Chooses the bearer token for an outgoing request.
///
/// Resolution order:
/// 1. Explicit override (`LIMINALDB_API_KEY`), returned without expiry checks
/// 2. Stored credential from `liminaldb login`, if not expired
///
/// Expired credentials are refused even when a refresh token is stored;
/// refreshing is not implemented.
#[derive(Clone)]
pub struct TokenResolver {
    override_token: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("override_token", &self.override_token.as_ref().map(|_| ".."))
            .field("store", &"..")
            .finish()
    }
}

impl TokenResolver {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            override_token: None,
            store,
        }
    }

    /// Empty overrides are ignored.
    pub fn with_override(mut self, token: Option<String>) -> Self {
        self.override_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn has_override(&self) -> bool {
        self.override_token.is_some()
    }

    pub fn resolve(&self) -> Result<String, AuthError> {
        self.resolve_at(Utc::now())
    }

    pub fn resolve_at(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        if let Some(token) = &self.override_token {
            return Ok(token.clone());
        }

        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => return Err(AuthError::NotAuthenticated),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load stored credential");
                return Err(AuthError::NotAuthenticated);
            }
        };

        if !credential.is_valid_at(now) {
            tracing::debug!("stored credential expired");
            return Err(AuthError::NotAuthenticated);
        }
        Ok(credential.access_token)
    }
}
