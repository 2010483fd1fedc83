//! PostgreSQL implementation of FavoriteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use curio_core::entities::{Favorite, FavoriteEntry};
use curio_core::error::DomainError;
use curio_core::traits::{FavoriteRepository, RepoResult};
use curio_core::value_objects::ActorKey;

use crate::models::{FavoriteModel, FavoriteWithPostModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of FavoriteRepository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new PgFavoriteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    #[instrument(skip(self))]
    async fn find(&self, actor: &ActorKey, post_id: Uuid) -> RepoResult<Option<Favorite>> {
        let result = sqlx::query_as::<_, FavoriteModel>(
            r#"
            SELECT id, post_id, actor_key, created_at
            FROM favorites
            WHERE actor_key = $1 AND post_id = $2
            "#,
        )
        .bind(actor.as_str())
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Favorite::from))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Favorite>> {
        let result = sqlx::query_as::<_, FavoriteModel>(
            r#"
            SELECT id, post_id, actor_key, created_at
            FROM favorites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Favorite::from))
    }

    #[instrument(skip(self))]
    async fn find_by_actor(&self, actor: &ActorKey) -> RepoResult<Vec<FavoriteEntry>> {
        let results = sqlx::query_as::<_, FavoriteWithPostModel>(
            r#"
            SELECT f.id, f.post_id, f.actor_key, f.created_at,
                   p.title AS post_title, p.excerpt AS post_excerpt,
                   p.author AS post_author, p.category AS post_category,
                   p.created_at AS post_created_at
            FROM favorites f
            LEFT JOIN blog_posts p ON p.id = f.post_id
            WHERE f.actor_key = $1
            ORDER BY f.created_at DESC, f.id
            "#,
        )
        .bind(actor.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(FavoriteEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM favorites WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn create(&self, favorite: &Favorite) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favorites (id, post_id, actor_key, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(favorite.id)
        .bind(favorite.post_id)
        .bind(favorite.actor.as_str())
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::FavoriteAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FavoriteNotFound(id));
        }

        Ok(())
    }
}
