//! Business logic services
//!
//! Identity resolution, toggle engines, and the dependency container they share.

pub mod context;
pub mod error;
pub mod favorite;
pub mod identity;
pub mod locks;
pub mod reaction;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use favorite::{FavoriteService, FavoriteToggled};
pub use identity::{AnonymousIdentityProvider, SessionIdentityProvider};
pub use locks::KeyedLocks;
pub use reaction::{ReactionService, ReactionSnapshot, ReactionState, Transition};
