//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in curio-core.

mod error;
mod favorite;
mod reaction;

pub use favorite::PgFavoriteRepository;
pub use reaction::PgReactionRepository;
