//! # curio-service
//!
//! Application layer: identity resolution, the reaction and favorite toggle
//! engines, and the display models that hold the client-side view.

pub mod display;
pub mod services;

pub use display::{FavoriteButton, FavoriteView, ReactionBoard};
pub use services::{
    AnonymousIdentityProvider, FavoriteService, FavoriteToggled, KeyedLocks, ReactionService,
    ReactionSnapshot, ReactionState, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionIdentityProvider, Transition,
};
