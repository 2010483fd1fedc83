//! Domain entities - core business objects

mod favorite;
mod post;
mod reaction;

pub use favorite::{Favorite, FavoriteEntry};
pub use post::PostSummary;
pub use reaction::{own_kinds, Reaction, ReactionCount, ReactionTally};
