//! Reaction policy - how many reactions an identity may hold per target

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{ReactionKeyScheme, ReactionKind};

/// Uniqueness slot shared by every kind under the single policy
pub const SINGLE_SLOT: &str = "*";

/// Reaction cardinality per (identity, target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionCardinality {
    /// At most one reaction; choosing another kind replaces it
    #[default]
    Single,
    /// Each kind toggles independently
    Multiple,
}

impl FromStr for ReactionCardinality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" | "multi" => Ok(Self::Multiple),
            other => Err(DomainError::ValidationError(format!(
                "unknown reaction cardinality '{other}'"
            ))),
        }
    }
}

/// Reaction rules shared by every component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionPolicy {
    pub cardinality: ReactionCardinality,
    pub key_scheme: ReactionKeyScheme,
}

impl ReactionPolicy {
    pub const fn new(cardinality: ReactionCardinality, key_scheme: ReactionKeyScheme) -> Self {
        Self {
            cardinality,
            key_scheme,
        }
    }

    /// Single-reaction policy with emoji keys
    pub const fn single() -> Self {
        Self::new(ReactionCardinality::Single, ReactionKeyScheme::Emoji)
    }

    /// Multi-reaction policy with emoji keys
    pub const fn multiple() -> Self {
        Self::new(ReactionCardinality::Multiple, ReactionKeyScheme::Emoji)
    }

    #[inline]
    pub const fn allows_multiple(&self) -> bool {
        matches!(self.cardinality, ReactionCardinality::Multiple)
    }

    /// The store keeps at most one row per (actor, target, slot)
    ///
    /// Under the single policy every kind shares one slot; under the multiple
    /// policy each kind has its own.
    pub const fn slot(&self, kind: ReactionKind) -> &'static str {
        match self.cardinality {
            ReactionCardinality::Single => SINGLE_SLOT,
            ReactionCardinality::Multiple => kind.label(),
        }
    }
}
