//! # curio-core
//!
//! Domain layer containing entities, value objects, the reaction aggregation
//! rules, and the repository/identity ports.
//! This crate has zero dependencies on infrastructure (database, storage, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    own_kinds, Favorite, FavoriteEntry, PostSummary, Reaction, ReactionCount, ReactionTally,
};
pub use error::DomainError;
pub use traits::{
    FavoriteRepository, IdentityProvider, ReactionRepository, RepoResult, SessionSource,
    TokenStore,
};
pub use value_objects::{
    ActorKey, Identity, ReactionCardinality, ReactionKeyScheme, ReactionKind, ReactionPolicy,
    ReactionTarget,
};
