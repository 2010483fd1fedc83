//! Actor identity
//!
//! An actor is either an anonymous browser profile (identified by a random
//! token persisted on the client) or a signed-in account. Only the actor key
//! ever reaches the store.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key that scopes reactions and favorites to one actor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorKey(String);

impl ActorKey {
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ActorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The resolved current actor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    /// Client-held random token
    Anonymous(String),
    /// Backend-issued account id
    Account(String),
}

impl Identity {
    /// Key used for store rows
    pub fn actor_key(&self) -> ActorKey {
        match self {
            Self::Anonymous(token) => ActorKey::new(token.clone()),
            Self::Account(id) => ActorKey::new(id.clone()),
        }
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    /// Generate a fresh anonymous identity
    ///
    /// Format: `anon_<base36 unix millis>_<9 random [a-z0-9]>`
    pub fn generate_anonymous() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self::Anonymous(format!("anon_{}_{}", to_base36(millis), random_suffix(9)))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous(token) => write!(f, "anonymous:{token}"),
            Self::Account(id) => write!(f, "account:{id}"),
        }
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
