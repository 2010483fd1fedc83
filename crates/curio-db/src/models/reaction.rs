//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for reactions table
///
/// Exactly one of `post_id` / `image_url` is set.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub reaction_type: String,
    pub actor_key: String,
    pub created_at: DateTime<Utc>,
}
