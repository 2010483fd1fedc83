//! Ports implemented by the infrastructure layers

mod identity;
mod repositories;

pub use identity::{IdentityProvider, SessionSource, TokenStore};
pub use repositories::{FavoriteRepository, ReactionRepository, RepoResult};
