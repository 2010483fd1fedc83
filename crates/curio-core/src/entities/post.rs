//! Post summary - the fields of a blog post shown next to a favorite

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only summary of a blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}
