//! Service context - dependency container for services
//!
//! Holds the repositories, the identity provider, the reaction policy, and
//! the per-key locks shared by every engine.

use std::sync::Arc;
use tracing::info;

use curio_common::{
    try_init_tracing_with_config, AppConfig, IdentityMode, SessionTokenVerifier, TracingConfig,
};
use curio_core::traits::{FavoriteRepository, IdentityProvider, ReactionRepository, SessionSource};
use curio_core::{DomainError, ReactionPolicy};
use curio_db::{create_pool, DatabaseConfig, FileTokenStore, PgFavoriteRepository, PgReactionRepository};

use super::error::{ServiceError, ServiceResult};
use super::identity::{AnonymousIdentityProvider, SessionIdentityProvider};
use super::locks::KeyedLocks;

/// Service context containing all dependencies
///
/// Cloning is cheap; clones share repositories, identity and locks.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    reaction_repo: Arc<dyn ReactionRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,

    // Current actor
    identity: Arc<dyn IdentityProvider>,

    // Rules
    policy: ReactionPolicy,

    // Serializes toggles per (actor, target)
    locks: Arc<KeyedLocks>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        reaction_repo: Arc<dyn ReactionRepository>,
        favorite_repo: Arc<dyn FavoriteRepository>,
        identity: Arc<dyn IdentityProvider>,
        policy: ReactionPolicy,
    ) -> Self {
        Self {
            reaction_repo,
            favorite_repo,
            identity,
            policy,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Wire the store-backed context described by `config`
    ///
    /// `session` is required in account mode. The identity provider is
    /// initialized before returning, so an anonymous token exists from here on.
    ///
    /// # Errors
    /// Returns an error if the store is unreachable, the identity settings are
    /// incomplete, or the anonymous token cannot be persisted
    pub async fn from_config(
        config: &AppConfig,
        session: Option<Arc<dyn SessionSource>>,
    ) -> ServiceResult<Self> {
        let policy = config.reactions.policy();

        let pool = create_pool(&DatabaseConfig::from(&config.database))
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let identity: Arc<dyn IdentityProvider> = match config.identity.mode {
            IdentityMode::Anonymous => {
                let store = Arc::new(FileTokenStore::new(&config.identity.token_path));
                Arc::new(AnonymousIdentityProvider::new(
                    store,
                    config.identity.token_key.clone(),
                ))
            }
            IdentityMode::Account => {
                let session = session.ok_or_else(|| {
                    ServiceError::validation("account identity mode needs a session source")
                })?;
                let secret = config.identity.jwt_secret.as_deref().ok_or_else(|| {
                    ServiceError::validation("account identity mode needs AUTH_JWT_SECRET")
                })?;
                let verifier =
                    SessionTokenVerifier::new(secret, config.identity.jwt_audience.clone());
                Arc::new(SessionIdentityProvider::new(session, verifier))
            }
        };

        identity.initialize().await?;

        info!(
            cardinality = ?policy.cardinality,
            key_scheme = ?policy.key_scheme,
            identity_mode = ?config.identity.mode,
            "Service context ready"
        );

        Ok(Self::new(
            Arc::new(PgReactionRepository::new(pool.clone(), policy)),
            Arc::new(PgFavoriteRepository::new(pool)),
            identity,
            policy,
        ))
    }

    /// Load configuration from the environment, set up tracing, and wire the context
    ///
    /// # Errors
    /// Returns an error if configuration is invalid or [`Self::from_config`] fails
    pub async fn from_env(session: Option<Arc<dyn SessionSource>>) -> ServiceResult<Self> {
        let config = AppConfig::from_env().map_err(curio_common::AppError::from)?;

        // A subscriber installed by the host application wins
        let _ = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env));

        Self::from_config(&config, session).await
    }

    // === Repositories ===

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the favorite repository
    pub fn favorite_repo(&self) -> &dyn FavoriteRepository {
        self.favorite_repo.as_ref()
    }

    // === Identity & Rules ===

    /// Get the identity provider
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Get the reaction policy
    pub fn policy(&self) -> ReactionPolicy {
        self.policy
    }

    /// Get the per-key locks
    pub fn locks(&self) -> &KeyedLocks {
        self.locks.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("policy", &self.policy)
            .field("locks", &self.locks)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom dependencies
pub struct ServiceContextBuilder {
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    favorite_repo: Option<Arc<dyn FavoriteRepository>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    policy: ReactionPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_repo: None,
            favorite_repo: None,
            identity: None,
            policy: ReactionPolicy::default(),
        }
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn favorite_repo(mut self, repo: Arc<dyn FavoriteRepository>) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn policy(mut self, policy: ReactionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.favorite_repo
                .ok_or_else(|| ServiceError::validation("favorite_repo is required"))?,
            self.identity
                .ok_or_else(|| ServiceError::validation("identity is required"))?,
            self.policy,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
