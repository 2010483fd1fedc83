//! Reaction entity - one actor's reaction to a post or gallery image
//!
//! Also holds the aggregation rules that turn a row snapshot into display
//! counts. Aggregation is pure: the same rows always give the same tally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::value_objects::{ActorKey, ReactionKind, ReactionTarget};

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub target: ReactionTarget,
    pub kind: ReactionKind,
    pub actor: ActorKey,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(target: ReactionTarget, kind: ReactionKind, actor: ActorKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            kind,
            actor,
            created_at: Utc::now(),
        }
    }

    /// Check if reaction uses a specific kind
    #[inline]
    pub fn is_kind(&self, kind: ReactionKind) -> bool {
        self.kind == kind
    }

    /// Check if reaction belongs to an actor
    #[inline]
    pub fn is_by(&self, actor: &ActorKey) -> bool {
        &self.actor == actor
    }
}

/// Per-kind counts for one target
///
/// Kinds nobody used are absent from [`ReactionTally::counts_by_kind`];
/// [`ReactionTally::count`] reports them as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTally {
    counts_by_kind: BTreeMap<ReactionKind, i64>,
    total: i64,
}

impl ReactionTally {
    /// Aggregate a row snapshot
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a Reaction>,
    {
        let mut tally = Self::default();
        for row in rows {
            *tally.counts_by_kind.entry(row.kind).or_insert(0) += 1;
            tally.total += 1;
        }
        tally
    }

    #[inline]
    pub fn count(&self, kind: ReactionKind) -> i64 {
        self.counts_by_kind.get(&kind).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total(&self) -> i64 {
        self.total
    }

    #[inline]
    pub fn counts_by_kind(&self) -> &BTreeMap<ReactionKind, i64> {
        &self.counts_by_kind
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Display rows for every used kind, flagged with the actor's own kinds
    pub fn with_mine(&self, mine: &BTreeSet<ReactionKind>) -> Vec<ReactionCount> {
        self.counts_by_kind
            .iter()
            .map(|(kind, count)| ReactionCount::new(*kind, *count, mine.contains(kind)))
            .collect()
    }
}

/// Kinds an actor currently holds among the given rows
pub fn own_kinds<'a, I>(rows: I, actor: &ActorKey) -> BTreeSet<ReactionKind>
where
    I: IntoIterator<Item = &'a Reaction>,
{
    rows.into_iter()
        .filter(|row| row.is_by(actor))
        .map(|row| row.kind)
        .collect()
}

/// Aggregated reaction count for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub kind: ReactionKind,
    pub count: i64,
    pub me: bool,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(kind: ReactionKind, count: i64, me: bool) -> Self {
        Self { kind, count, me }
    }
}
