//! Repository traits (ports) - define the interface for data access
//!
//! The toggle engines depend only on these traits. The remote row store
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Favorite, FavoriteEntry, Reaction};
use crate::error::DomainError;
use crate::value_objects::{ActorKey, ReactionKind, ReactionTarget};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Get all reactions for a target, oldest first
    async fn find_by_target(&self, target: &ReactionTarget) -> RepoResult<Vec<Reaction>>;

    /// Find the actor's reaction on a target, optionally of one kind
    ///
    /// Without a kind the oldest matching row is returned.
    async fn find_own(
        &self,
        actor: &ActorKey,
        target: &ReactionTarget,
        kind: Option<ReactionKind>,
    ) -> RepoResult<Option<Reaction>>;

    /// Get every reaction the actor holds on a target
    async fn find_own_all(&self, actor: &ActorKey, target: &ReactionTarget) -> RepoResult<Vec<Reaction>>;

    /// Get actors who reacted with a specific kind, oldest first
    async fn find_actors_by_kind(
        &self,
        target: &ReactionTarget,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<ActorKey>>;

    /// Add a reaction and return the stored row
    ///
    /// Fails with `ReactionAlreadyExists` when the actor already holds the
    /// reaction's slot on the target (see `ReactionPolicy::slot`).
    async fn create(&self, reaction: &Reaction) -> RepoResult<Reaction>;

    /// Change the kind of an existing reaction
    ///
    /// Fails with `ReactionAlreadyExists` when the new kind's slot is taken.
    async fn update_kind(&self, id: Uuid, kind: ReactionKind) -> RepoResult<()>;

    /// Remove a reaction
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Delete the row when `kind` is `None`, otherwise retype it
    async fn remove_or_update(&self, id: Uuid, kind: Option<ReactionKind>) -> RepoResult<()> {
        match kind {
            Some(kind) => self.update_kind(id, kind).await,
            None => self.delete(id).await,
        }
    }
}

// ============================================================================
// Favorite Repository
// ============================================================================

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Find the actor's favorite on a post
    async fn find(&self, actor: &ActorKey, post_id: Uuid) -> RepoResult<Option<Favorite>>;

    /// Find favorite by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Favorite>>;

    /// List the actor's favorites with post summaries, newest first
    async fn find_by_actor(&self, actor: &ActorKey) -> RepoResult<Vec<FavoriteEntry>>;

    /// Count favorites on a post
    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64>;

    /// Add a favorite
    ///
    /// Fails with `FavoriteAlreadyExists` when the store's uniqueness rule rejects it.
    async fn create(&self, favorite: &Favorite) -> RepoResult<()>;

    /// Remove a favorite
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}
