//! Identity providers
//!
//! - [`AnonymousIdentityProvider`]: a random token created once and kept in
//!   client storage
//! - [`SessionIdentityProvider`]: the account behind the auth provider's
//!   current session, checked on every call

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use curio_common::SessionTokenVerifier;
use curio_core::traits::{IdentityProvider, RepoResult, SessionSource, TokenStore};
use curio_core::{DomainError, Identity};

// ============================================================================
// Anonymous
// ============================================================================

/// Resolves the browser-profile token, creating and persisting it on first use
pub struct AnonymousIdentityProvider {
    store: Arc<dyn TokenStore>,
    key: String,
    identity: OnceCell<Identity>,
}

impl AnonymousIdentityProvider {
    pub fn new(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            identity: OnceCell::new(),
        }
    }

    /// The identity, once initialized
    pub fn current(&self) -> Option<&Identity> {
        self.identity.get()
    }

    async fn load(&self) -> RepoResult<&Identity> {
        self.identity
            .get_or_try_init(|| async {
                if let Some(token) = self.store.get(&self.key).await? {
                    let token = token.trim();
                    if !token.is_empty() {
                        debug!(key = %self.key, "Loaded anonymous token");
                        return Ok(Identity::Anonymous(token.to_string()));
                    }
                }

                let identity = Identity::generate_anonymous();
                self.store
                    .set(&self.key, identity.actor_key().as_str())
                    .await?;
                info!(actor = %identity.actor_key(), "Created anonymous identity");
                Ok::<_, DomainError>(identity)
            })
            .await
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    #[instrument(skip(self))]
    async fn initialize(&self) -> RepoResult<()> {
        self.load().await.map(|_| ())
    }

    async fn resolve(&self) -> RepoResult<Option<Identity>> {
        self.load().await.map(|identity| Some(identity.clone()))
    }
}

impl std::fmt::Debug for AnonymousIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymousIdentityProvider")
            .field("key", &self.key)
            .field("initialized", &self.identity.initialized())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session
// ============================================================================

/// Resolves the signed-in account from the current session's access token
///
/// Nothing is cached: signing out takes effect on the next call.
pub struct SessionIdentityProvider {
    source: Arc<dyn SessionSource>,
    verifier: SessionTokenVerifier,
}

impl SessionIdentityProvider {
    pub fn new(source: Arc<dyn SessionSource>, verifier: SessionTokenVerifier) -> Self {
        Self { source, verifier }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentityProvider {
    async fn initialize(&self) -> RepoResult<()> {
        Ok(())
    }

    #[instrument(skip(self))]
    async fn resolve(&self) -> RepoResult<Option<Identity>> {
        let Some(token) = self.source.access_token().await? else {
            debug!("No active session");
            return Ok(None);
        };

        let claims = match self.verifier.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Session token rejected");
                return Ok(None);
            }
        };

        match claims.account_id() {
            Ok(account_id) => Ok(Some(Identity::Account(account_id.to_string()))),
            Err(e) => {
                debug!(error = %e, "Session token has no subject");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for SessionIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentityProvider")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}
