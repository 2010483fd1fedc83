//! Reaction target - the post or gallery image a reaction belongs to

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::ValidateUrl;

use crate::error::DomainError;

/// The entity being reacted to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "ref", rename_all = "snake_case")]
pub enum ReactionTarget {
    /// A blog post
    Post(Uuid),
    /// A public image URL from a post gallery
    Image(String),
}

impl ReactionTarget {
    /// Target a post
    #[inline]
    pub const fn post(id: Uuid) -> Self {
        Self::Post(id)
    }

    /// Target a gallery image; the URL must be absolute http(s)
    pub fn image(url: impl Into<String>) -> Result<Self, DomainError> {
        let url = url.into();
        let url = url.trim();
        let is_http = url.starts_with("https://") || url.starts_with("http://");
        if !is_http || !url.validate_url() {
            return Err(DomainError::InvalidTarget(url.to_string()));
        }
        Ok(Self::Image(url.to_string()))
    }

    /// Post id, if this targets a post
    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            Self::Post(id) => Some(*id),
            Self::Image(_) => None,
        }
    }

    /// Image URL, if this targets an image
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Post(_) => None,
            Self::Image(url) => Some(url),
        }
    }

    /// Rebuild a target from the two nullable store columns
    pub fn from_columns(post_id: Option<Uuid>, image_url: Option<String>) -> Result<Self, DomainError> {
        match (post_id, image_url) {
            (Some(id), None) => Ok(Self::Post(id)),
            (None, Some(url)) => Ok(Self::Image(url)),
            (Some(id), Some(url)) => Err(DomainError::InvalidTarget(format!(
                "row references both post {id} and image {url}"
            ))),
            (None, None) => Err(DomainError::InvalidTarget(
                "row references neither a post nor an image".to_string(),
            )),
        }
    }
}

impl fmt::Display for ReactionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post(id) => write!(f, "post:{id}"),
            Self::Image(url) => write!(f, "image:{url}"),
        }
    }
}
