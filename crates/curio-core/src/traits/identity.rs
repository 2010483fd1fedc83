//! Identity ports
//!
//! How the current actor is resolved, and the client-side collaborators the
//! resolvers need.

use async_trait::async_trait;

use super::RepoResult;
use crate::value_objects::Identity;

/// Resolves the current actor
///
/// Implementations are injected into the services; nothing reads identity
/// from global state.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Prepare the provider (e.g. create and persist an anonymous token)
    ///
    /// Calling it more than once has no further effect.
    async fn initialize(&self) -> RepoResult<()>;

    /// Resolve the current actor, or `None` when nobody is signed in
    async fn resolve(&self) -> RepoResult<Option<Identity>>;
}

/// Durable client-side key/value storage
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// Source of the auth provider's current session
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Access token of the active session, if any
    async fn access_token(&self) -> RepoResult<Option<String>>;
}
