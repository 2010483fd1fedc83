//! Reaction service
//!
//! The reaction toggle engine plus the reads that feed the display.
//!
//! Single policy, per (actor, target):
//!
//! | state           | select(k)      | select(k'), k' != k |
//! |-----------------|----------------|---------------------|
//! | `Unreacted`     | insert → `ReactedAs(k)` | -          |
//! | `ReactedAs(k)`  | delete → `Unreacted`    | update → `ReactedAs(k')` |
//!
//! Multiple policy: `select(k)` toggles membership of `k` on its own row.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

use curio_core::entities::{own_kinds, Reaction, ReactionCount, ReactionTally};
use curio_core::{ActorKey, Identity, ReactionKind, ReactionTarget};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::locks::KeyedLocks;

/// Most actors returned by [`ReactionService::reactors`]
pub const MAX_REACTORS: i64 = 100;

/// What a `select` did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transition {
    Added { kind: ReactionKind },
    Changed { from: ReactionKind, to: ReactionKind },
    Removed { kind: ReactionKind },
}

impl Transition {
    /// Whether `kind` is held after the transition
    pub fn holds(&self, kind: ReactionKind) -> bool {
        match self {
            Self::Added { kind: k } => *k == kind,
            Self::Changed { to, .. } => *to == kind,
            Self::Removed { .. } => false,
        }
    }
}

/// An actor's reactions on one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReactionState {
    Unreacted,
    /// Single policy
    ReactedAs(ReactionKind),
    /// Multiple policy; never empty
    ReactedWith(BTreeSet<ReactionKind>),
}

impl ReactionState {
    /// Build the state for a set of held kinds under either policy
    pub fn from_kinds(kinds: BTreeSet<ReactionKind>, multiple: bool) -> Self {
        if kinds.is_empty() {
            return Self::Unreacted;
        }
        if !multiple && kinds.len() == 1 {
            if let Some(kind) = kinds.first() {
                return Self::ReactedAs(*kind);
            }
        }
        Self::ReactedWith(kinds)
    }

    pub fn has(&self, kind: ReactionKind) -> bool {
        match self {
            Self::Unreacted => false,
            Self::ReactedAs(k) => *k == kind,
            Self::ReactedWith(kinds) => kinds.contains(&kind),
        }
    }

    pub fn kinds(&self) -> BTreeSet<ReactionKind> {
        match self {
            Self::Unreacted => BTreeSet::new(),
            Self::ReactedAs(k) => BTreeSet::from([*k]),
            Self::ReactedWith(kinds) => kinds.clone(),
        }
    }
}

/// Counts for one target plus the current actor's own kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionSnapshot {
    pub target: ReactionTarget,
    pub tally: ReactionTally,
    pub mine: BTreeSet<ReactionKind>,
    /// The read failed; counts are shown as empty
    pub degraded: bool,
}

impl ReactionSnapshot {
    /// Zero counts, nothing selected
    pub fn empty(target: ReactionTarget) -> Self {
        Self {
            target,
            tally: ReactionTally::default(),
            mine: BTreeSet::new(),
            degraded: false,
        }
    }

    fn degraded(target: ReactionTarget) -> Self {
        Self {
            degraded: true,
            ..Self::empty(target)
        }
    }

    /// Display rows for every used kind
    pub fn counts(&self) -> Vec<ReactionCount> {
        self.tally.with_mine(&self.mine)
    }

    pub fn count(&self, kind: ReactionKind) -> i64 {
        self.tally.count(kind)
    }

    pub fn total(&self) -> i64 {
        self.tally.total()
    }

    pub fn is_mine(&self, kind: ReactionKind) -> bool {
        self.mine.contains(&kind)
    }
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Toggle
    // ========================================================================

    /// Toggle `kind` on `target` for the current actor
    ///
    /// Fails with `AuthenticationRequired` before touching the store when no
    /// identity resolves.
    #[instrument(skip(self))]
    pub async fn select(&self, target: &ReactionTarget, kind: ReactionKind) -> ServiceResult<Transition> {
        let identity = self.require_identity().await?;
        let actor = identity.actor_key();

        let _guard = self
            .ctx
            .locks()
            .lock(KeyedLocks::reaction_key(&actor, target))
            .await;

        let transition = if self.ctx.policy().allows_multiple() {
            self.toggle_one(&actor, target, kind).await?
        } else {
            self.select_single(&actor, target, kind).await?
        };

        info!(
            actor = %actor,
            target = %target,
            transition = ?transition,
            "Reaction toggled"
        );

        Ok(transition)
    }

    async fn select_single(
        &self,
        actor: &ActorKey,
        target: &ReactionTarget,
        kind: ReactionKind,
    ) -> ServiceResult<Transition> {
        let repo = self.ctx.reaction_repo();

        match repo.find_own(actor, target, None).await? {
            None => {
                let created = repo
                    .create(&Reaction::new(target.clone(), kind, actor.clone()))
                    .await?;
                Ok(Transition::Added { kind: created.kind })
            }
            Some(existing) if existing.is_kind(kind) => {
                repo.remove_or_update(existing.id, None).await?;
                Ok(Transition::Removed { kind })
            }
            Some(existing) => {
                repo.remove_or_update(existing.id, Some(kind)).await?;
                Ok(Transition::Changed {
                    from: existing.kind,
                    to: kind,
                })
            }
        }
    }

    async fn toggle_one(
        &self,
        actor: &ActorKey,
        target: &ReactionTarget,
        kind: ReactionKind,
    ) -> ServiceResult<Transition> {
        let repo = self.ctx.reaction_repo();

        match repo.find_own(actor, target, Some(kind)).await? {
            Some(existing) => {
                repo.delete(existing.id).await?;
                Ok(Transition::Removed { kind })
            }
            None => {
                let created = repo
                    .create(&Reaction::new(target.clone(), kind, actor.clone()))
                    .await?;
                Ok(Transition::Added { kind: created.kind })
            }
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The current actor's state on `target`
    #[instrument(skip(self))]
    pub async fn state(&self, target: &ReactionTarget) -> ServiceResult<ReactionState> {
        let Some(identity) = self.current_identity().await? else {
            return Ok(ReactionState::Unreacted);
        };
        let actor = identity.actor_key();
        let multiple = self.ctx.policy().allows_multiple();

        let kinds: BTreeSet<ReactionKind> = if multiple {
            self.ctx
                .reaction_repo()
                .find_own_all(&actor, target)
                .await?
                .into_iter()
                .map(|r| r.kind)
                .collect()
        } else {
            self.ctx
                .reaction_repo()
                .find_own(&actor, target, None)
                .await?
                .map(|r| r.kind)
                .into_iter()
                .collect()
        };

        Ok(ReactionState::from_kinds(kinds, multiple))
    }

    /// Counts per kind; empty when the read fails
    #[instrument(skip(self))]
    pub async fn counts(&self, target: &ReactionTarget) -> ReactionTally {
        match self.ctx.reaction_repo().find_by_target(target).await {
            Ok(rows) => ReactionTally::from_rows(&rows),
            Err(e) => {
                warn!(target = %target, error = %e, "Reaction counts unavailable");
                ReactionTally::default()
            }
        }
    }

    /// Counts plus the current actor's own kinds; never fails
    #[instrument(skip(self))]
    pub async fn snapshot(&self, target: &ReactionTarget) -> ReactionSnapshot {
        let rows = match self.ctx.reaction_repo().find_by_target(target).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(target = %target, error = %e, "Reaction snapshot degraded");
                return ReactionSnapshot::degraded(target.clone());
            }
        };

        let mine = match self.current_identity().await {
            Ok(Some(identity)) => own_kinds(&rows, &identity.actor_key()),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(target = %target, error = %e, "Identity unavailable for reaction snapshot");
                BTreeSet::new()
            }
        };

        ReactionSnapshot {
            target: target.clone(),
            tally: ReactionTally::from_rows(&rows),
            mine,
            degraded: false,
        }
    }

    /// Actors who reacted with `kind`, oldest first
    #[instrument(skip(self))]
    pub async fn reactors(
        &self,
        target: &ReactionTarget,
        kind: ReactionKind,
        limit: i64,
    ) -> ServiceResult<Vec<ActorKey>> {
        let limit = limit.clamp(1, MAX_REACTORS);
        Ok(self
            .ctx
            .reaction_repo()
            .find_actors_by_kind(target, kind, limit)
            .await?)
    }

    // ========================================================================
    // Identity
    // ========================================================================

    async fn current_identity(&self) -> ServiceResult<Option<Identity>> {
        Ok(self.ctx.identity().resolve().await?)
    }

    async fn require_identity(&self) -> ServiceResult<Identity> {
        self.current_identity()
            .await?
            .ok_or(ServiceError::AuthenticationRequired)
    }
}
