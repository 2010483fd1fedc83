//! Database models - SQLx-compatible structs for PostgreSQL tables

mod favorite;
mod reaction;

pub use favorite::{FavoriteModel, FavoriteWithPostModel};
pub use reaction::ReactionModel;
