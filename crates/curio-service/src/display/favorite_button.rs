//! Favorite button - optimistic favorite toggle for one post

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::services::{
    FavoriteService, FavoriteToggled, KeyedLocks, ServiceContext, ServiceResult,
};

/// What the button shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FavoriteView {
    pub favorited: bool,
    pub count: i64,
}

impl FavoriteView {
    pub fn new(favorited: bool, count: i64) -> Self {
        Self {
            favorited,
            count: count.max(0),
        }
    }

    /// The view after one toggle; the count never drops below zero
    pub fn flipped(self) -> Self {
        if self.favorited {
            Self::new(false, self.count - 1)
        } else {
            Self::new(true, self.count + 1)
        }
    }

    /// This view moved to a known favorited state
    fn settled(self, favorited: bool) -> Self {
        if self.favorited == favorited {
            self
        } else {
            self.flipped()
        }
    }
}

/// Holds the favorite state and count for one post
///
/// A toggle applies the flip before the store call and restores the previous
/// view exactly if the call fails. When the store reports an outcome the
/// flip did not predict, the count is reloaded.
pub struct FavoriteButton {
    ctx: ServiceContext,
    post_id: Uuid,
    view: Mutex<FavoriteView>,
}

impl FavoriteButton {
    pub fn new(ctx: ServiceContext, post_id: Uuid, initial: FavoriteView) -> Self {
        Self {
            ctx,
            post_id,
            view: Mutex::new(initial),
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    /// The currently displayed state
    pub fn view(&self) -> FavoriteView {
        *self.view.lock()
    }

    /// Load state and count from the store
    #[instrument(skip(self), fields(post_id = %self.post_id))]
    pub async fn load(&self) -> ServiceResult<FavoriteView> {
        let service = FavoriteService::new(&self.ctx);
        let favorited = service.is_favorited(self.post_id).await?;
        let count = service.count(self.post_id).await?;

        let view = FavoriteView::new(favorited, count);
        *self.view.lock() = view;
        Ok(view)
    }

    /// Toggle optimistically
    ///
    /// A missing identity fails before the view changes. Toggles on the same
    /// post by the same actor queue behind each other, so each one flips from
    /// the state the previous one settled on.
    #[instrument(skip(self), fields(post_id = %self.post_id))]
    pub async fn toggle(&self) -> ServiceResult<FavoriteView> {
        let service = FavoriteService::new(&self.ctx);
        let actor = service.require_identity().await?.actor_key();

        let _guard = self
            .ctx
            .locks()
            .lock(KeyedLocks::favorite_key(&actor, self.post_id))
            .await;

        let prior = {
            let mut view = self.view.lock();
            let prior = *view;
            *view = prior.flipped();
            prior
        };

        match service.toggle_locked(&actor, self.post_id).await {
            Ok(FavoriteToggled { favorited, .. }) if favorited != prior.favorited => {
                let settled = prior.settled(favorited);
                *self.view.lock() = settled;
                Ok(settled)
            }
            Ok(FavoriteToggled { favorited, .. }) => {
                // The view was stale, so its count is too
                let view = match service.count(self.post_id).await {
                    Ok(count) => FavoriteView::new(favorited, count),
                    Err(e) => {
                        warn!(actor = %actor, error = %e, "Favorite count reload failed");
                        prior.settled(favorited)
                    }
                };
                debug!(actor = %actor, favorited, count = view.count, "Stale favorite view reloaded");
                *self.view.lock() = view;
                Ok(view)
            }
            Err(e) => {
                *self.view.lock() = prior;
                warn!(actor = %actor, error = %e, "Favorite toggle failed; view restored");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for FavoriteButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteButton")
            .field("post_id", &self.post_id)
            .field("view", &*self.view.lock())
            .finish_non_exhaustive()
    }
}
