//! Favorite service
//!
//! One boolean per (actor, post), stored as the existence of a row.

use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use curio_core::entities::{Favorite, FavoriteEntry};
use curio_core::{ActorKey, Identity};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::locks::KeyedLocks;

/// Outcome of a favorite toggle as reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteToggled {
    pub post_id: Uuid,
    pub favorited: bool,
    /// The new row, when one was created
    pub favorite: Option<Favorite>,
}

/// Favorite service
pub struct FavoriteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FavoriteService<'a> {
    /// Create a new FavoriteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve the current actor, if any
    pub async fn current_identity(&self) -> ServiceResult<Option<Identity>> {
        Ok(self.ctx.identity().resolve().await?)
    }

    /// Resolve the current actor or fail with `AuthenticationRequired`
    pub async fn require_identity(&self) -> ServiceResult<Identity> {
        self.current_identity()
            .await?
            .ok_or(ServiceError::AuthenticationRequired)
    }

    /// Toggle the current actor's favorite on a post
    #[instrument(skip(self))]
    pub async fn toggle(&self, post_id: Uuid) -> ServiceResult<FavoriteToggled> {
        let identity = self.require_identity().await?;
        self.toggle_as(&identity, post_id).await
    }

    /// Toggle a favorite for an already resolved identity
    #[instrument(skip(self))]
    pub async fn toggle_as(&self, identity: &Identity, post_id: Uuid) -> ServiceResult<FavoriteToggled> {
        let actor = identity.actor_key();
        let _guard = self
            .ctx
            .locks()
            .lock(KeyedLocks::favorite_key(&actor, post_id))
            .await;

        self.toggle_locked(&actor, post_id).await
    }

    /// Flip the row; the caller holds the (actor, post) lock
    pub(crate) async fn toggle_locked(&self, actor: &ActorKey, post_id: Uuid) -> ServiceResult<FavoriteToggled> {
        let repo = self.ctx.favorite_repo();

        let outcome = match repo.find(actor, post_id).await? {
            Some(existing) => {
                repo.delete(existing.id).await?;
                FavoriteToggled {
                    post_id,
                    favorited: false,
                    favorite: None,
                }
            }
            None => {
                let favorite = Favorite::new(post_id, actor.clone());
                repo.create(&favorite).await?;
                FavoriteToggled {
                    post_id,
                    favorited: true,
                    favorite: Some(favorite),
                }
            }
        };

        info!(
            actor = %actor,
            post_id = %post_id,
            favorited = outcome.favorited,
            "Favorite toggled"
        );

        Ok(outcome)
    }

    /// Whether the current actor has favorited a post; false without an identity
    #[instrument(skip(self))]
    pub async fn is_favorited(&self, post_id: Uuid) -> ServiceResult<bool> {
        let Some(identity) = self.current_identity().await? else {
            return Ok(false);
        };

        Ok(self
            .ctx
            .favorite_repo()
            .find(&identity.actor_key(), post_id)
            .await?
            .is_some())
    }

    /// The current actor's favorites, newest first; empty without an identity
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<FavoriteEntry>> {
        let Some(identity) = self.current_identity().await? else {
            return Ok(Vec::new());
        };

        Ok(self
            .ctx
            .favorite_repo()
            .find_by_actor(&identity.actor_key())
            .await?)
    }

    /// Remove one of the current actor's favorites by row id
    ///
    /// Another actor's row is reported as not found.
    #[instrument(skip(self))]
    pub async fn remove(&self, favorite_id: Uuid) -> ServiceResult<()> {
        let identity = self.require_identity().await?;
        let actor = identity.actor_key();
        let repo = self.ctx.favorite_repo();

        let favorite = repo
            .find_by_id(favorite_id)
            .await?
            .filter(|f| f.is_by(&actor))
            .ok_or_else(|| ServiceError::not_found("Favorite", favorite_id.to_string()))?;

        let _guard = self
            .ctx
            .locks()
            .lock(KeyedLocks::favorite_key(&actor, favorite.post_id))
            .await;

        repo.delete(favorite.id).await?;

        info!(
            actor = %actor,
            post_id = %favorite.post_id,
            favorite_id = %favorite.id,
            "Favorite removed"
        );

        Ok(())
    }

    /// Total favorites on a post
    #[instrument(skip(self))]
    pub async fn count(&self, post_id: Uuid) -> ServiceResult<i64> {
        let count = self.ctx.favorite_repo().count_by_post(post_id).await?;
        Ok(count.max(0))
    }
}
