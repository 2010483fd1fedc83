//! Display models
//!
//! The client-side view of a target: what the UI renders between reloads.
//! The store stays the source of truth; these only hold the last answer.

mod favorite_button;
mod reaction_board;

pub use favorite_button::{FavoriteButton, FavoriteView};
pub use reaction_board::ReactionBoard;
