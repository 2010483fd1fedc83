//! # curio-db
//!
//! Storage layer implementing the repository traits.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations for the remote row store
//! - Row models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations
//! - The client-persisted key/value store backing the anonymous token
//!
//! ## Usage
//!
//! ```rust,ignore
//! use curio_db::{create_pool, run_migrations, DatabaseConfig, PgReactionRepository};
//! use curio_core::ReactionKeyScheme;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let reactions = PgReactionRepository::new(pool, ReactionKeyScheme::Emoji);
//!     Ok(())
//! }
//! ```

pub mod local;
pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use local::FileTokenStore;
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{PgFavoriteRepository, PgReactionRepository};
