//! Reaction board - the reaction bar under a post or image

use parking_lot::RwLock;
use tracing::{debug, instrument};

use curio_core::{ReactionKind, ReactionTarget};

use crate::services::{ReactionService, ReactionSnapshot, ServiceContext, ServiceResult, Transition};

/// Holds the last loaded counts for one target
///
/// Every mutation attempt that reached the store is followed by a reload, so
/// the view reflects store truth whether the write succeeded or not.
pub struct ReactionBoard {
    ctx: ServiceContext,
    target: ReactionTarget,
    snapshot: RwLock<ReactionSnapshot>,
}

impl ReactionBoard {
    /// Create an empty board; call [`Self::refresh`] to load it
    pub fn new(ctx: ServiceContext, target: ReactionTarget) -> Self {
        let snapshot = RwLock::new(ReactionSnapshot::empty(target.clone()));
        Self {
            ctx,
            target,
            snapshot,
        }
    }

    pub fn target(&self) -> &ReactionTarget {
        &self.target
    }

    /// The currently displayed snapshot
    pub fn view(&self) -> ReactionSnapshot {
        self.snapshot.read().clone()
    }

    /// Reload counts from the store
    #[instrument(skip(self), fields(target = %self.target))]
    pub async fn refresh(&self) -> ReactionSnapshot {
        let snapshot = ReactionService::new(&self.ctx).snapshot(&self.target).await;
        *self.snapshot.write() = snapshot.clone();
        snapshot
    }

    /// Toggle `kind` for the current actor, then reload
    ///
    /// The error is returned after the reload so the caller can alert on it.
    #[instrument(skip(self), fields(target = %self.target))]
    pub async fn select(&self, kind: ReactionKind) -> ServiceResult<Transition> {
        let result = ReactionService::new(&self.ctx)
            .select(&self.target, kind)
            .await;

        match &result {
            Err(e) if e.is_authentication_required() => {
                debug!("No identity; reaction not attempted");
            }
            _ => {
                self.refresh().await;
            }
        }

        result
    }
}

impl std::fmt::Debug for ReactionBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionBoard")
            .field("target", &self.target)
            .field("snapshot", &*self.snapshot.read())
            .finish_non_exhaustive()
    }
}
