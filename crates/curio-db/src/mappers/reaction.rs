//! Reaction entity <-> model mapper

use chrono::{DateTime, Utc};
use uuid::Uuid;

use curio_core::entities::Reaction;
use curio_core::error::DomainError;
use curio_core::value_objects::{
    ActorKey, ReactionKeyScheme, ReactionKind, ReactionPolicy, ReactionTarget,
};

use crate::models::ReactionModel;

impl ReactionModel {
    /// Convert a row into a Reaction entity
    ///
    /// The stored key is parsed under `scheme`; a key from another scheme or
    /// vocabulary is an `UnknownReactionKind` error.
    pub fn into_entity(self, scheme: ReactionKeyScheme) -> Result<Reaction, DomainError> {
        let kind = ReactionKind::from_key(&self.reaction_type, scheme)?;
        let target = ReactionTarget::from_columns(self.post_id, self.image_url)?;

        Ok(Reaction {
            id: self.id,
            target,
            kind,
            actor: ActorKey::new(self.actor_key),
            created_at: self.created_at,
        })
    }
}

/// Reaction entity values for database insertion
pub struct ReactionInsert<'a> {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub image_url: Option<&'a str>,
    pub reaction_type: &'static str,
    pub slot: &'static str,
    pub actor_key: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> ReactionInsert<'a> {
    pub fn new(reaction: &'a Reaction, policy: ReactionPolicy) -> Self {
        Self {
            id: reaction.id,
            post_id: reaction.target.post_id(),
            image_url: reaction.target.image_url(),
            reaction_type: reaction.kind.key(policy.key_scheme),
            slot: policy.slot(reaction.kind),
            actor_key: reaction.actor.as_str(),
            created_at: reaction.created_at,
        }
    }
}
