//! Reaction vocabulary
//!
//! A fixed set of reaction kinds. Each kind has two stable keys (the emoji
//! itself and a lowercase label); which one is persisted is decided by the
//! configured [`ReactionKeyScheme`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the reactions a reader can leave on a post or image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Laugh,
    Scared,
    Skeptical,
}

impl ReactionKind {
    /// Every kind, in display order
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::Like,
        ReactionKind::Love,
        ReactionKind::Laugh,
        ReactionKind::Scared,
        ReactionKind::Skeptical,
    ];

    /// Emoji key
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Like => "👍",
            Self::Love => "❤️",
            Self::Laugh => "😂",
            Self::Scared => "😱",
            Self::Skeptical => "🤔",
        }
    }

    /// Label key
    pub const fn label(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Laugh => "laugh",
            Self::Scared => "scared",
            Self::Skeptical => "skeptical",
        }
    }

    /// The key persisted under the given scheme
    #[inline]
    pub const fn key(self, scheme: ReactionKeyScheme) -> &'static str {
        match scheme {
            ReactionKeyScheme::Emoji => self.emoji(),
            ReactionKeyScheme::Label => self.label(),
        }
    }

    /// Parse a persisted key under the given scheme
    pub fn from_key(key: &str, scheme: ReactionKeyScheme) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key(scheme) == key)
            .ok_or_else(|| DomainError::UnknownReactionKind(key.to_string()))
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Which key identifies a reaction kind in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKeyScheme {
    #[default]
    Emoji,
    Label,
}

impl FromStr for ReactionKeyScheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emoji" => Ok(Self::Emoji),
            "label" => Ok(Self::Label),
            other => Err(DomainError::ValidationError(format!(
                "unknown reaction key scheme '{other}'"
            ))),
        }
    }
}
