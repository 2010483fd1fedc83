//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Reaction not found: {0}")]
    ReactionNotFound(Uuid),

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown reaction kind: {0}")]
    UnknownReactionKind(String),

    #[error("Invalid reaction target: {0}")]
    InvalidTarget(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    #[error("Favorite already exists")]
    FavoriteAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ReactionNotFound(_) => "UNKNOWN_REACTION",
            Self::FavoriteNotFound(_) => "UNKNOWN_FAVORITE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnknownReactionKind(_) => "UNKNOWN_REACTION_KIND",
            Self::InvalidTarget(_) => "INVALID_TARGET",

            // Conflict
            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",
            Self::FavoriteAlreadyExists => "FAVORITE_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ReactionNotFound(_) | Self::FavoriteNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::UnknownReactionKind(_) | Self::InvalidTarget(_)
        )
    }

    /// Check if this is a uniqueness conflict reported by the store
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ReactionAlreadyExists | Self::FavoriteAlreadyExists
        )
    }
}
