//! Favorite entity - one actor's bookmark on one post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PostSummary;
use crate::value_objects::ActorKey;

/// Favorite entity; the row's existence is the favorited state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub post_id: Uuid,
    pub actor: ActorKey,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Create a new Favorite
    pub fn new(post_id: Uuid, actor: ActorKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            actor,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_by(&self, actor: &ActorKey) -> bool {
        &self.actor == actor
    }
}

/// A favorite together with the post it points at
///
/// `post` is `None` when the post has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub favorite: Favorite,
    pub post: Option<PostSummary>,
}
