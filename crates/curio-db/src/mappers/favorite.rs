//! Favorite entity <-> model mapper

use curio_core::entities::{Favorite, FavoriteEntry, PostSummary};
use curio_core::value_objects::ActorKey;

use crate::models::{FavoriteModel, FavoriteWithPostModel};

/// Convert FavoriteModel to Favorite entity
impl From<FavoriteModel> for Favorite {
    fn from(model: FavoriteModel) -> Self {
        Favorite {
            id: model.id,
            post_id: model.post_id,
            actor: ActorKey::new(model.actor_key),
            created_at: model.created_at,
        }
    }
}

/// Convert a joined row to a FavoriteEntry
///
/// The summary is only built when the join found the post.
impl From<FavoriteWithPostModel> for FavoriteEntry {
    fn from(model: FavoriteWithPostModel) -> Self {
        let post = match (model.post_title, model.post_created_at) {
            (Some(title), Some(created_at)) => Some(PostSummary {
                id: model.post_id,
                title,
                excerpt: model.post_excerpt,
                author: model.post_author,
                category: model.post_category,
                created_at,
            }),
            _ => None,
        };

        FavoriteEntry {
            favorite: Favorite {
                id: model.id,
                post_id: model.post_id,
                actor: ActorKey::new(model.actor_key),
                created_at: model.created_at,
            },
            post,
        }
    }
}
