//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use curio_core::entities::Reaction;
use curio_core::error::DomainError;
use curio_core::traits::{ReactionRepository, RepoResult};
use curio_core::value_objects::{
    ActorKey, ReactionKeyScheme, ReactionKind, ReactionPolicy, ReactionTarget,
};

use crate::mappers::ReactionInsert;
use crate::models::ReactionModel;

use super::error::{map_db_error, map_unique_violation};

const REACTION_COLUMNS: &str = "id, post_id, image_url, reaction_type, actor_key, created_at";

/// PostgreSQL implementation of ReactionRepository
///
/// Kinds are written and parsed with the configured key scheme. Every row
/// also carries the policy's uniqueness slot, so the store itself rejects a
/// second reaction where the policy allows only one.
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
    policy: ReactionPolicy,
    scheme: ReactionKeyScheme,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool, policy: ReactionPolicy) -> Self {
        Self {
            pool,
            policy,
            scheme: policy.key_scheme,
        }
    }

    /// Parse rows, skipping any whose key or target is unreadable
    fn into_entities(&self, rows: Vec<ReactionModel>) -> Vec<Reaction> {
        rows.into_iter()
            .filter_map(|row| {
                let id = row.id;
                match row.into_entity(self.scheme) {
                    Ok(reaction) => Some(reaction),
                    Err(e) => {
                        warn!(reaction_id = %id, error = %e, "Skipping unreadable reaction row");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Column holding the target reference
fn target_column(target: &ReactionTarget) -> &'static str {
    match target {
        ReactionTarget::Post(_) => "post_id",
        ReactionTarget::Image(_) => "image_url",
    }
}

/// Bind the target reference as the next parameter
fn bind_target<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    target: &'q ReactionTarget,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match target {
        ReactionTarget::Post(id) => query.bind(*id),
        ReactionTarget::Image(url) => query.bind(url.as_str()),
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find_by_target(&self, target: &ReactionTarget) -> RepoResult<Vec<Reaction>> {
        let sql = format!(
            "SELECT {REACTION_COLUMNS} FROM reactions WHERE {} = $1 ORDER BY created_at, id",
            target_column(target)
        );

        let rows = bind_target(sqlx::query_as::<_, ReactionModel>(&sql), target)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(self.into_entities(rows))
    }

    #[instrument(skip(self))]
    async fn find_own(
        &self,
        actor: &ActorKey,
        target: &ReactionTarget,
        kind: Option<ReactionKind>,
    ) -> RepoResult<Option<Reaction>> {
        let sql = format!(
            r#"
            SELECT {REACTION_COLUMNS}
            FROM reactions
            WHERE {} = $1 AND actor_key = $2 AND ($3::text IS NULL OR reaction_type = $3)
            ORDER BY created_at, id
            "#,
            target_column(target)
        );

        let rows = bind_target(sqlx::query_as::<_, ReactionModel>(&sql), target)
            .bind(actor.as_str())
            .bind(kind.map(|k| k.key(self.scheme)))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(self.into_entities(rows).into_iter().next())
    }

    #[instrument(skip(self))]
    async fn find_own_all(&self, actor: &ActorKey, target: &ReactionTarget) -> RepoResult<Vec<Reaction>> {
        let sql = format!(
            r#"
            SELECT {REACTION_COLUMNS}
            FROM reactions
            WHERE {} = $1 AND actor_key = $2
            ORDER BY created_at, id
            "#,
            target_column(target)
        );

        let rows = bind_target(sqlx::query_as::<_, ReactionModel>(&sql), target)
            .bind(actor.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(self.into_entities(rows))
    }

    #[instrument(skip(self))]
    async fn find_actors_by_kind(
        &self,
        target: &ReactionTarget,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<ActorKey>> {
        let limit = limit.clamp(1, 100);
        let sql = format!(
            r#"
            SELECT actor_key
            FROM reactions
            WHERE {} = $1 AND reaction_type = $2
            ORDER BY created_at, id
            LIMIT $3
            "#,
            target_column(target)
        );

        let query = sqlx::query_scalar::<_, String>(&sql);
        let query = match target {
            ReactionTarget::Post(id) => query.bind(*id),
            ReactionTarget::Image(url) => query.bind(url.as_str()),
        };

        let results = query
            .bind(kind.key(self.scheme))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(ActorKey::new).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, reaction: &Reaction) -> RepoResult<Reaction> {
        let insert = ReactionInsert::new(reaction, self.policy);
        let sql = format!(
            r#"
            INSERT INTO reactions (id, post_id, image_url, reaction_type, slot, actor_key, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REACTION_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ReactionModel>(&sql)
            .bind(insert.id)
            .bind(insert.post_id)
            .bind(insert.image_url)
            .bind(insert.reaction_type)
            .bind(insert.slot)
            .bind(insert.actor_key)
            .bind(insert.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        row.into_entity(self.scheme)
    }

    #[instrument(skip(self))]
    async fn update_kind(&self, id: Uuid, kind: ReactionKind) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reactions SET reaction_type = $2, slot = $3 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(kind.key(self.scheme))
        .bind(self.policy.slot(kind))
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM reactions WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound(id));
        }

        Ok(())
    }
}
