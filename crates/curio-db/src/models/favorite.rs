//! Favorite database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for favorites table
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteModel {
    pub id: Uuid,
    pub post_id: Uuid,
    pub actor_key: String,
    pub created_at: DateTime<Utc>,
}

/// Favorite row LEFT JOINed with its post summary
///
/// The `post_*` columns are NULL when the post no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteWithPostModel {
    pub id: Uuid,
    pub post_id: Uuid,
    pub actor_key: String,
    pub created_at: DateTime<Utc>,
    pub post_title: Option<String>,
    pub post_excerpt: Option<String>,
    pub post_author: Option<String>,
    pub post_category: Option<String>,
    pub post_created_at: Option<DateTime<Utc>>,
}
