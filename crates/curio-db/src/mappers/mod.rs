//! Entity to model mappers
//!
//! Conversions between domain entities (curio-core) and database models.
//! - `into_entity` / `From<Model> for Entity`: database rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod favorite;
mod reaction;

pub use reaction::ReactionInsert;
