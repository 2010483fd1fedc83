//! Value objects - immutable types that represent domain concepts

mod identity;
mod policy;
mod reaction_kind;
mod target;

pub use identity::{ActorKey, Identity};
pub use policy::{ReactionCardinality, ReactionPolicy};
pub use reaction_kind::{ReactionKeyScheme, ReactionKind};
pub use target::ReactionTarget;
